//! Battle state store
//!
//! One battle's worth of tracked state, rebuilt from scratch every time a
//! battle room opens. Everything here is plain data; the transition logic
//! lives in [`crate::mutate`] and rendering in [`crate::format`].

use sableye_protocol::request::{BaseStats, RequestPokemon};
use sableye_protocol::server::HpStat;

use crate::boosts::BoostTable;
use crate::field::FieldConditions;

/// Whether a battle is currently being tracked.
///
/// The store is `Uninitialized` outside a battle; an |init| event replaces
/// the whole value with a fresh `Active` battle, so nothing ever carries
/// over between battles.
#[derive(Debug, Clone, Default)]
pub enum BattleState {
    #[default]
    Uninitialized,
    Active(ActiveBattle),
}

impl BattleState {
    pub fn battle(&self) -> Option<&ActiveBattle> {
        match self {
            BattleState::Active(battle) => Some(battle),
            BattleState::Uninitialized => None,
        }
    }

    pub fn battle_mut(&mut self) -> Option<&mut ActiveBattle> {
        match self {
            BattleState::Active(battle) => Some(battle),
            BattleState::Uninitialized => None,
        }
    }
}

/// Full tracked state of one in-progress battle.
#[derive(Debug, Clone, Default)]
pub struct ActiveBattle {
    /// Format tag from the battle room (e.g. "gen9randombattle")
    pub format: String,

    /// Current turn, 0 until the first |turn|
    pub turn: u32,

    pub weather: Option<String>,
    pub terrain: Option<String>,
    pub field: FieldConditions,

    /// Our full roster, rebuilt on every request
    pub team: Team,

    /// Volatile detail of our active slot
    pub active: ActiveDetail,

    /// What we have learned about the opponent
    pub opponent: OpponentModel,

    /// Every move seen this battle, both sides
    pub move_history: Vec<MoveRecord>,

    /// Every HP change seen this battle, both sides
    pub damage_history: Vec<DamageRecord>,
}

impl ActiveBattle {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }
}

/// Our roster with one member marked active by index.
#[derive(Debug, Clone, Default)]
pub struct Team {
    pub members: Vec<TeamMember>,
    pub active_index: Option<usize>,
}

impl Team {
    pub fn active(&self) -> Option<&TeamMember> {
        self.members.get(self.active_index?)
    }

    pub fn active_mut(&mut self) -> Option<&mut TeamMember> {
        let index = self.active_index?;
        self.members.get_mut(index)
    }

    pub fn alive_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_alive()).count()
    }

    /// Non-active members that could still be switched in.
    pub fn switch_candidates(&self) -> Vec<&TeamMember> {
        self.members
            .iter()
            .enumerate()
            .filter(|&(i, m)| Some(i) != self.active_index && m.is_alive())
            .map(|(_, m)| m)
            .collect()
    }
}

/// One of our roster members, as last reported by a request.
#[derive(Debug, Clone, Default)]
pub struct TeamMember {
    /// Identifier string (e.g. "p1: Bronzong")
    pub ident: String,
    /// Display name from the identifier
    pub name: String,
    /// Details string (species, level, gender)
    pub details: String,
    /// Parsed HP; None when the condition string carries no fraction
    /// (fainted, or unparsable)
    pub hp: Option<HpStat>,
    /// Status ailment token, if any
    pub status: Option<String>,
    pub moves: Vec<String>,
    pub stats: Option<BaseStats>,
    pub ability: String,
    pub item: String,
    pub active: bool,
}

impl TeamMember {
    pub fn from_request(pokemon: &RequestPokemon) -> Self {
        Self {
            ident: pokemon.ident.clone(),
            name: pokemon.name().to_string(),
            details: pokemon.details.clone(),
            hp: HpStat::parse(&pokemon.condition),
            status: pokemon.status().map(str::to_string),
            moves: pokemon.moves.clone(),
            stats: Some(pokemon.stats.clone()),
            ability: pokemon.ability.clone(),
            item: pokemon.item.clone(),
            active: pokemon.active,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp.is_some_and(|hp| hp.current > 0)
    }
}

/// A move slot our active pokemon may pick from, by 1-based index.
#[derive(Debug, Clone)]
pub struct MoveOption {
    pub name: String,
    pub disabled: bool,
}

/// Volatile per-stint detail of our active slot.
///
/// Replaced whenever a request reports a new active pokemon; boosts and
/// volatiles belong to the stint, not the roster member.
#[derive(Debug, Clone, Default)]
pub struct ActiveDetail {
    pub moves: Vec<MoveOption>,
    pub can_switch: bool,
    pub boosts: BoostTable,
    pub volatiles: Vec<String>,
    pub tera_used: bool,
}

/// Everything revealed about the opponent so far.
#[derive(Debug, Clone, Default)]
pub struct OpponentModel {
    pub active: OpponentActive,
    /// Append-only ledger of revealed team members
    pub known_team: Vec<KnownPokemon>,
    pub last_move: Option<String>,
    /// Whether the opponent's last HP change was damage or healing
    pub last_hp_change: Option<HpChangeKind>,
}

impl OpponentModel {
    /// Record a revealed opponent pokemon, once per (name, details) pair.
    pub fn reveal(&mut self, name: &str, details: &str, turn: u32) {
        let seen = self
            .known_team
            .iter()
            .any(|p| p.name == name && p.details == details);
        if !seen {
            self.known_team.push(KnownPokemon {
                name: name.to_string(),
                details: details.to_string(),
                first_seen_turn: turn,
            });
        }
    }
}

/// Snapshot of the opponent's currently active pokemon.
///
/// Fields are individually optional: an opponent's move can arrive before
/// any switch revealed who is out (at battle start the lead switch can be
/// misattributed), and each formatter line checks its own field.
#[derive(Debug, Clone, Default)]
pub struct OpponentActive {
    pub name: Option<String>,
    pub details: Option<String>,
    /// Raw condition string as reported (opponent HP comes as percentages)
    pub condition: Option<String>,
    pub status: Option<String>,
    /// Moves this pokemon has been seen using this stint
    pub moves: Vec<String>,
    pub boosts: BoostTable,
}

/// Ledger entry for a revealed opponent pokemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownPokemon {
    pub name: String,
    pub details: String,
    pub first_seen_turn: u32,
}

/// One entry in the global move log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub turn: u32,
    pub actor: String,
    pub move_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpChangeKind {
    Damage,
    Heal,
}

impl HpChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HpChangeKind::Damage => "damage",
            HpChangeKind::Heal => "heal",
        }
    }
}

/// One entry in the HP-change log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageRecord {
    pub kind: HpChangeKind,
    /// Actor string as it appeared on the wire
    pub target: String,
    /// New condition string
    pub condition: String,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, condition: &str) -> TeamMember {
        TeamMember {
            ident: format!("p1: {name}"),
            name: name.to_string(),
            details: name.to_string(),
            hp: HpStat::parse(condition),
            ..TeamMember::default()
        }
    }

    #[test]
    fn test_switch_candidates_exclude_active_and_fainted() {
        let team = Team {
            members: vec![
                member("Bronzong", "250/250"),
                member("Gyarados", "0 fnt"),
                member("Heatran", "12/262"),
            ],
            active_index: Some(0),
        };

        let candidates = team.switch_candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Heatran");
        assert_eq!(team.alive_count(), 2);
    }

    #[test]
    fn test_opponent_reveal_is_idempotent() {
        let mut opponent = OpponentModel::default();
        opponent.reveal("Gyarados", "Gyarados, L78, F", 1);
        opponent.reveal("Gyarados", "Gyarados, L78, F", 3);
        assert_eq!(opponent.known_team.len(), 1);
        assert_eq!(opponent.known_team[0].first_seen_turn, 1);

        // Same name, different details is a new entry
        opponent.reveal("Gyarados", "Gyarados, L80, M", 4);
        assert_eq!(opponent.known_team.len(), 2);
    }

    #[test]
    fn test_battle_state_accessors() {
        let mut state = BattleState::default();
        assert!(state.battle().is_none());

        state = BattleState::Active(ActiveBattle::new("gen9randombattle"));
        assert_eq!(state.battle().unwrap().format, "gen9randombattle");
        state.battle_mut().unwrap().turn = 3;
        assert_eq!(state.battle().unwrap().turn, 3);
    }
}
