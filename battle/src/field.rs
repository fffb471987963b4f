//! Entry hazard tracking

/// Entry hazards reported by |-field| lines.
///
/// Stackable hazards carry a layer counter, binary ones a flag. The
/// vocabulary is fixed; unrecognized condition names are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldConditions {
    pub spikes: u8,
    pub toxic_spikes: u8,
    pub stealth_rock: bool,
    pub sticky_web: bool,
}

impl FieldConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a field condition by name, case-insensitively.
    pub fn apply(&mut self, condition: &str) {
        match condition.to_lowercase().as_str() {
            "spikes" => self.spikes += 1,
            "toxic spikes" => self.toxic_spikes += 1,
            "stealth rock" => self.stealth_rock = true,
            "sticky web" => self.sticky_web = true,
            _ => {}
        }
    }

    /// Active hazards as display entries, counters with layer counts.
    pub fn summary(&self) -> Vec<String> {
        let mut entries = Vec::new();
        if self.spikes > 0 {
            entries.push(format!("spikes ({})", self.spikes));
        }
        if self.toxic_spikes > 0 {
            entries.push(format!("toxic spikes ({})", self.toxic_spikes));
        }
        if self.stealth_rock {
            entries.push("stealth rock".to_string());
        }
        if self.sticky_web {
            entries.push("sticky web".to_string());
        }
        entries
    }
}
