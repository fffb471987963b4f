//! Runtime configuration from the environment

use std::env;

pub const DEFAULT_FORMAT: &str = "gen9randombattle";

/// Client configuration, read once at startup.
///
/// Without credentials the client plays as a guest; without a challenge
/// target it searches the ladder.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Battle format to search or challenge in
    pub format: String,
    /// When set, challenge this user instead of searching the ladder
    pub challenge_user: Option<String>,
}

impl Config {
    /// Read SHOWDOWN_USERNAME, SHOWDOWN_PASSWORD, SHOWDOWN_FORMAT and
    /// SHOWDOWN_CHALLENGE from the environment.
    pub fn from_env() -> Self {
        Self {
            username: non_empty(env::var("SHOWDOWN_USERNAME").ok()),
            password: non_empty(env::var("SHOWDOWN_PASSWORD").ok()),
            format: non_empty(env::var("SHOWDOWN_FORMAT").ok())
                .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
            challenge_user: non_empty(env::var("SHOWDOWN_CHALLENGE").ok()),
        }
    }

    /// Guest play when either credential is missing.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_treated_as_unset() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(
            non_empty(Some("someuser".to_string())),
            Some("someuser".to_string())
        );
    }

    #[test]
    fn test_default_config_is_guest() {
        let config = Config {
            format: DEFAULT_FORMAT.to_string(),
            ..Config::default()
        };
        assert!(!config.has_credentials());
        assert_eq!(config.format, "gen9randombattle");
    }
}
