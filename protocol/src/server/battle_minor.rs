//! Minor battle action message parsers: status, boosts, HP changes,
//! weather and field conditions

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

/// Parse |-status|POKEMON|STATUS
pub fn parse_status(msg: &RawMessage) -> Result<ServerMessage> {
    let actor = parse_actor(msg, 2)?;
    let status = msg.field(3).unwrap_or_default().to_string();

    Ok(ServerMessage::Status { actor, status })
}

/// Parse |-boost|POKEMON|STAT|AMOUNT or |-unboost|... with `sign` -1.
///
/// The stat key stays a raw string here; the state layer ignores keys
/// outside the boost table vocabulary.
pub fn parse_boost(msg: &RawMessage, sign: i32) -> Result<ServerMessage> {
    let actor = parse_actor(msg, 2)?;
    let stat = msg.field(3).unwrap_or_default().to_string();
    let amount: i32 = msg
        .field(4)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::MissingField("boost amount".to_string()))?;

    Ok(ServerMessage::Boost {
        actor,
        stat,
        delta: sign * amount,
    })
}

/// Parse |-damage|POKEMON|CONDITION|REASON (or |-heal| with `damage` false)
pub fn parse_hp_change(msg: &RawMessage, damage: bool) -> Result<ServerMessage> {
    let actor = parse_actor(msg, 2)?;
    let condition = msg.field(3).unwrap_or_default().to_string();
    let reason = msg.field(4).filter(|s| !s.is_empty()).map(str::to_string);

    Ok(if damage {
        ServerMessage::Damage {
            actor,
            condition,
            reason,
        }
    } else {
        ServerMessage::Heal {
            actor,
            condition,
            reason,
        }
    })
}

/// Parse |-weather|WEATHER
pub fn parse_weather(msg: &RawMessage) -> Result<ServerMessage> {
    let weather = msg.field(2).unwrap_or_default().to_string();
    Ok(ServerMessage::Weather(weather))
}

/// Parse |-field|CONDITION
pub fn parse_field(msg: &RawMessage) -> Result<ServerMessage> {
    let condition = msg.field(2).unwrap_or_default().to_string();
    Ok(ServerMessage::FieldChange(condition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::tokenize_frame;

    #[test]
    fn test_parse_status() {
        let frame = tokenize_frame("|-status|p2a: Gyarados|par");
        let msg = parse_status(&frame.messages[0]).unwrap();
        match msg {
            ServerMessage::Status { actor, status } => {
                assert_eq!(actor.name, "Gyarados");
                assert_eq!(status, "par");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_boost_sign() {
        let frame = tokenize_frame("|-boost|p1a: Bronzong|atk|1");
        match parse_boost(&frame.messages[0], 1).unwrap() {
            ServerMessage::Boost { delta, .. } => assert_eq!(delta, 1),
            other => panic!("unexpected message: {other:?}"),
        }

        match parse_boost(&frame.messages[0], -1).unwrap() {
            ServerMessage::Boost { delta, .. } => assert_eq!(delta, -1),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_boost_missing_amount_errors() {
        let frame = tokenize_frame("|-boost|p1a: Bronzong|atk");
        assert!(parse_boost(&frame.messages[0], 1).is_err());
    }

    #[test]
    fn test_parse_heal_without_reason() {
        let frame = tokenize_frame("|-heal|p1a: Bronzong|90/100");
        match parse_hp_change(&frame.messages[0], false).unwrap() {
            ServerMessage::Heal { reason, .. } => assert_eq!(reason, None),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
