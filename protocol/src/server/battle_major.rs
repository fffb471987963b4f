//! Major battle action message parsers: switches and moves

use anyhow::Result;

use super::ServerMessage;
use super::battle::ActorRef;
use crate::ParseError;
use crate::frame::RawMessage;

fn parse_actor(msg: &RawMessage, index: usize) -> Result<ActorRef> {
    msg.field(index)
        .filter(|s| !s.is_empty())
        .map(ActorRef::parse)
        .ok_or_else(|| ParseError::MissingField("pokemon".to_string()).into())
}

/// Parse |switch|POKEMON|DETAILS|CONDITION
pub fn parse_switch(msg: &RawMessage) -> Result<ServerMessage> {
    let actor = parse_actor(msg, 2)?;
    let details = msg.field(3).unwrap_or_default().to_string();
    let condition = msg.field(4).unwrap_or_default().to_string();

    Ok(ServerMessage::Switch {
        actor,
        details,
        condition,
    })
}

/// Parse |move|POKEMON|MOVE|TARGET
pub fn parse_move(msg: &RawMessage) -> Result<ServerMessage> {
    let actor = parse_actor(msg, 2)?;
    let move_name = msg.field(3).unwrap_or_default().to_string();

    Ok(ServerMessage::Move { actor, move_name })
}
