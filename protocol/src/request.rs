//! Battle request payload types
//!
//! These types mirror the JSON structure embedded in |request| messages:
//! the player's full roster plus the actions currently legal for the
//! active slot.

use serde::Deserialize;

use crate::server::SideId;

/// A decision request from the simulator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    /// Request ID for synchronization
    pub rqid: Option<u64>,

    /// Active slots and the moves they may use; absent when the request
    /// asks only for a switch.
    #[serde(default)]
    pub active: Option<Vec<ActiveOptions>>,

    /// The player's side: identity plus full roster.
    pub side: RequestSide,

    /// Which slots must switch (fainted or forced out)
    #[serde(default)]
    pub force_switch: Option<Vec<bool>>,

    /// Waiting on the opponent; no decision needed.
    #[serde(default)]
    pub wait: bool,
}

impl BattleRequest {
    /// Whether this request actually asks for a decision.
    pub fn needs_decision(&self) -> bool {
        !self.wait && (self.force_switch.is_some() || self.active.is_some())
    }

    /// Whether a switch is being forced this request.
    pub fn is_force_switch(&self) -> bool {
        self.force_switch
            .as_ref()
            .map(|fs| fs.iter().any(|&b| b))
            .unwrap_or(false)
    }
}

/// Legal actions for one active slot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOptions {
    #[serde(default)]
    pub moves: Vec<MoveSlot>,

    #[serde(default)]
    pub trapped: bool,

    /// Tera type offered this battle, if terastallization is still
    /// available.
    #[serde(default)]
    pub can_terastallize: Option<String>,
}

impl ActiveOptions {
    /// Moves that can actually be chosen right now.
    pub fn available_moves(&self) -> Vec<&MoveSlot> {
        self.moves
            .iter()
            .filter(|m| !m.disabled && m.pp > 0)
            .collect()
    }
}

/// One move slot on an active pokemon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSlot {
    /// Display name of the move
    #[serde(rename = "move")]
    pub name: String,

    /// Move ID (lowercase, no spaces)
    pub id: String,

    /// Current PP
    #[serde(default)]
    pub pp: u32,

    /// Maximum PP
    #[serde(rename = "maxpp", default)]
    pub max_pp: u32,

    /// Target type (normal, self, allySide, ...)
    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub disabled: bool,
}

/// The player's side of a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSide {
    /// Player's display name
    pub name: String,

    /// Player ID ("p1" or "p2")
    pub id: String,

    #[serde(default)]
    pub pokemon: Vec<RequestPokemon>,
}

impl RequestSide {
    /// The side ID as a typed value.
    pub fn side(&self) -> Option<SideId> {
        SideId::parse(&self.id)
    }

    /// The roster entry marked active, if any.
    pub fn active_pokemon(&self) -> Option<&RequestPokemon> {
        self.pokemon.iter().find(|p| p.active)
    }
}

/// One roster entry in a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPokemon {
    /// Identifier (e.g. "p1: Bronzong")
    pub ident: String,

    /// Details string (species, level, gender)
    pub details: String,

    /// Condition string ("currentHP/maxHP status" or "0 fnt")
    pub condition: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub stats: BaseStats,

    /// Known move IDs
    #[serde(default)]
    pub moves: Vec<String>,

    #[serde(default)]
    pub ability: String,

    #[serde(default)]
    pub item: String,

    #[serde(default)]
    pub teratype: Option<String>,
}

impl RequestPokemon {
    /// Current and max HP from the condition string.
    ///
    /// Fainted ("0 fnt") and otherwise non-fractional conditions have no
    /// HP reading.
    pub fn hp(&self) -> Option<(u32, u32)> {
        let hp_part = self.condition.split_whitespace().next()?;
        let (current, max) = hp_part.split_once('/')?;
        Some((current.parse().ok()?, max.parse().ok()?))
    }

    /// Status condition token from the condition string, if present.
    pub fn status(&self) -> Option<&str> {
        self.condition.split_whitespace().nth(1)
    }

    pub fn is_fainted(&self) -> bool {
        self.condition == "0 fnt" || self.condition.ends_with(" fnt")
    }

    /// Species name from the details string.
    pub fn species(&self) -> &str {
        self.details.split(',').next().unwrap_or(&self.details)
    }

    /// Nickname from the ident string.
    pub fn name(&self) -> &str {
        self.ident
            .split_once(": ")
            .map(|(_, name)| name)
            .unwrap_or(&self.ident)
    }
}

/// Computed battle stats from a request roster entry.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BaseStats {
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "active": [{
            "moves": [
                {"move": "Gyro Ball", "id": "gyroball", "pp": 8, "maxpp": 8, "target": "normal", "disabled": false},
                {"move": "Hypnosis", "id": "hypnosis", "pp": 0, "maxpp": 32, "target": "normal", "disabled": false}
            ],
            "canTerastallize": "Steel"
        }],
        "side": {
            "name": "someuser",
            "id": "p1",
            "pokemon": [
                {
                    "ident": "p1: Bronzong",
                    "details": "Bronzong, L82",
                    "condition": "250/250",
                    "active": true,
                    "stats": {"atk": 203, "def": 236, "spa": 162, "spd": 236, "spe": 82},
                    "moves": ["gyroball", "hypnosis"],
                    "ability": "levitate",
                    "item": "leftovers",
                    "teratype": "Steel"
                },
                {
                    "ident": "p1: Gyarados",
                    "details": "Gyarados, L78, F",
                    "condition": "0 fnt",
                    "active": false
                }
            ]
        },
        "rqid": 3
    }"#;

    #[test]
    fn test_deserialize_request() {
        let req: BattleRequest = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(req.rqid, Some(3));
        assert_eq!(req.side.id, "p1");
        assert_eq!(req.side.side(), Some(SideId::P1));
        assert!(req.needs_decision());
        assert!(!req.is_force_switch());

        let active = req.active.as_ref().unwrap();
        assert_eq!(
            active[0].can_terastallize.as_deref(),
            Some("Steel")
        );
        let available = active[0].available_moves();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Gyro Ball");
    }

    #[test]
    fn test_roster_entry_helpers() {
        let req: BattleRequest = serde_json::from_str(SAMPLE).unwrap();
        let bronzong = &req.side.pokemon[0];
        assert_eq!(bronzong.species(), "Bronzong");
        assert_eq!(bronzong.name(), "Bronzong");
        assert_eq!(bronzong.hp(), Some((250, 250)));
        assert_eq!(bronzong.status(), None);
        assert!(!bronzong.is_fainted());

        let gyarados = &req.side.pokemon[1];
        assert!(gyarados.is_fainted());
        assert_eq!(gyarados.hp(), None);
        assert_eq!(req.side.active_pokemon().unwrap().species(), "Bronzong");
    }

    #[test]
    fn test_wait_request_needs_no_decision() {
        let json = r#"{"wait": true, "side": {"name": "someuser", "id": "p2", "pokemon": []}}"#;
        let req: BattleRequest = serde_json::from_str(json).unwrap();
        assert!(!req.needs_decision());
    }
}
