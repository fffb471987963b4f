//! Battle state tracking for Pokemon Showdown.
//!
//! This crate reconstructs one player's view of a battle from the typed
//! message stream and renders it as a plain-text snapshot for a decision
//! process.
//!
//! ```text
//! sableye-protocol (wire format)
//!        │
//!        ▼
//! sableye-battle (state store + tracking + formatting) ← THIS CRATE
//!        │
//!        └─> sableye-client (session loop, decision providers)
//! ```
//!
//! # Main Types
//!
//! - [`BattleTracker`] - entry point: feeds [`ServerMessage`]s into the store
//! - [`BattleState`] / [`ActiveBattle`] - the tracked state itself
//! - [`IdentityResolver`] - attributes stream actors to us or the opponent
//! - [`format::render`] - deterministic text snapshot of an active battle
//!
//! # Example
//!
//! ```
//! use sableye_battle::{BattleTracker, format};
//! use sableye_protocol::{parse_server_message, tokenize_frame};
//!
//! let mut tracker = BattleTracker::new(Some("someuser".to_string()));
//! for msg in tokenize_frame("|init|battle\n|turn|1").messages {
//!     if let Ok(parsed) = parse_server_message(&msg) {
//!         tracker.apply(&parsed);
//!     }
//! }
//!
//! let battle = tracker.state.battle().unwrap();
//! assert!(format::render(battle).contains("TURN 1"));
//! ```

pub mod boosts;
pub mod field;
pub mod format;
pub mod identity;
pub mod mutate;
pub mod state;

pub use boosts::BoostTable;
pub use field::FieldConditions;
pub use identity::{IdentityResolver, Resolved};
pub use mutate::BattleTracker;
pub use state::{
    ActiveBattle, ActiveDetail, BattleState, DamageRecord, HpChangeKind, KnownPokemon, MoveOption,
    MoveRecord, OpponentActive, OpponentModel, Team, TeamMember,
};

// Re-export commonly used protocol types
pub use sableye_protocol::server::{ActorRef, BoostStat, HpStat, ServerMessage, SideId};
