//! Login against the Pokemon Showdown auth endpoint

use anyhow::{Context, Result};

const LOGIN_URL: &str = "https://play.pokemonshowdown.com/api/login";

/// Exchange credentials plus the server's challenge string for a login
/// assertion.
pub async fn get_assertion(username: &str, password: &str, challstr: &str) -> Result<String> {
    let client = reqwest::Client::new();

    let response = client
        .post(LOGIN_URL)
        .form(&[
            ("name", username),
            ("pass", password),
            ("challstr", challstr),
        ])
        .send()
        .await
        .context("Failed to send login request")?;

    let body = response.text().await?;

    // Response starts with ']' followed by JSON
    let json_str = body
        .strip_prefix(']')
        .context("Invalid login response format")?;

    let json: serde_json::Value =
        serde_json::from_str(json_str).context("Failed to parse login response")?;

    let assertion = json
        .get("assertion")
        .and_then(|v| v.as_str())
        .context("No assertion in login response")?;

    // The endpoint reports errors as ";;MESSAGE" in the assertion field
    if let Some(message) = assertion.strip_prefix(";;") {
        anyhow::bail!("Login failed: {}", message);
    }

    Ok(assertion.to_string())
}
