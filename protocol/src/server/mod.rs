//! Typed server messages
//!
//! Each tokenized line is matched on its tag and handed to a small parse
//! function. Unknown tags become [`ServerMessage::Raw`] so new server
//! features never break the stream.

mod battle;
mod battle_init;
mod battle_major;
mod battle_minor;
mod battle_progress;
mod global;

use anyhow::Result;

use crate::frame::RawMessage;
use crate::request::BattleRequest;

pub use battle::{ActorRef, BoostStat, HpStat, SideId, condition_status};

/// One parsed protocol message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// |player|PLAYER|USERNAME|AVATAR|RATING
    Player { side: SideId, username: String },

    /// |challstr|CHALLSTR
    Challstr(String),

    /// |updateuser|USER|NAMED|AVATAR|SETTINGS - who the server thinks we
    /// are; `named` is false while we are still a guest.
    UpdateUser { username: String, named: bool },

    /// |init|battle - start of a battle room; FORMAT arrives here for
    /// the original stream this client targets.
    Init { format: String },

    /// |request|JSON - our roster plus currently legal actions.
    Request(Box<BattleRequest>),

    /// |switch|POKEMON|DETAILS|CONDITION
    Switch {
        actor: ActorRef,
        details: String,
        condition: String,
    },

    /// |move|POKEMON|MOVE|TARGET
    Move { actor: ActorRef, move_name: String },

    /// |-status|POKEMON|STATUS
    Status { actor: ActorRef, status: String },

    /// |-boost and |-unboost collapsed into one signed delta.
    Boost {
        actor: ActorRef,
        stat: String,
        delta: i32,
    },

    /// |-damage|POKEMON|CONDITION|[from]...
    Damage {
        actor: ActorRef,
        condition: String,
        reason: Option<String>,
    },

    /// |-heal|POKEMON|CONDITION|[from]...
    Heal {
        actor: ActorRef,
        condition: String,
        reason: Option<String>,
    },

    /// |-weather|WEATHER
    Weather(String),

    /// |-field|CONDITION
    FieldChange(String),

    /// |turn|NUMBER
    Turn(u32),

    /// |win|USER
    Win(String),

    /// |inactive|MESSAGE (battle timer notices)
    Inactive(String),

    /// |popup|MESSAGE
    Popup(String),

    /// Any tag this client does not interpret.
    Raw(String),
}

/// Parse one tokenized message into its typed form.
///
/// Errors mean this single message is malformed; callers skip it and keep
/// processing the rest of the frame.
pub fn parse_server_message(msg: &RawMessage) -> Result<ServerMessage> {
    match msg.tag() {
        "player" => battle_init::parse_player(msg),
        "init" => battle_init::parse_init(msg),
        "challstr" => global::parse_challstr(msg),
        "updateuser" => global::parse_updateuser(msg),
        "popup" => global::parse_popup(msg),
        "request" => battle_progress::parse_request(msg),
        "turn" => battle_progress::parse_turn(msg),
        "win" => battle_progress::parse_win(msg),
        "inactive" => battle_progress::parse_inactive(msg),
        "switch" => battle_major::parse_switch(msg),
        "move" => battle_major::parse_move(msg),
        "-status" => battle_minor::parse_status(msg),
        "-boost" => battle_minor::parse_boost(msg, 1),
        "-unboost" => battle_minor::parse_boost(msg, -1),
        "-damage" => battle_minor::parse_hp_change(msg, true),
        "-heal" => battle_minor::parse_hp_change(msg, false),
        "-weather" => battle_minor::parse_weather(msg),
        "-field" => battle_minor::parse_field(msg),
        _ => Ok(ServerMessage::Raw(msg.raw())),
    }
}
