//! Battle progress message parsers: request payloads, turn counter,
//! timers and the end of the battle

use anyhow::Result;

use super::ServerMessage;
use crate::ParseError;
use crate::frame::RawMessage;
use crate::request::BattleRequest;

/// Parse |request|REQUEST where REQUEST is a JSON payload.
///
/// The simulator sends an empty request between turns; those carry no
/// decision and come back as `Raw` so callers can skip them.
pub fn parse_request(msg: &RawMessage) -> Result<ServerMessage> {
    let json = msg.tail(2);
    if json.trim().is_empty() {
        return Ok(ServerMessage::Raw(msg.raw()));
    }

    let request: BattleRequest = serde_json::from_str(&json)
        .map_err(|e| ParseError::InvalidFormat(format!("request payload: {e}")))?;

    Ok(ServerMessage::Request(Box::new(request)))
}

/// Parse |turn|NUMBER
pub fn parse_turn(msg: &RawMessage) -> Result<ServerMessage> {
    let number: u32 = msg
        .field(2)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::MissingField("turn number".to_string()))?;

    Ok(ServerMessage::Turn(number))
}

/// Parse |win|USER
pub fn parse_win(msg: &RawMessage) -> Result<ServerMessage> {
    let winner = msg.field(2).unwrap_or_default().to_string();
    Ok(ServerMessage::Win(winner))
}

/// Parse |inactive|MESSAGE
pub fn parse_inactive(msg: &RawMessage) -> Result<ServerMessage> {
    Ok(ServerMessage::Inactive(msg.tail(2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::tokenize_frame;

    #[test]
    fn test_parse_request_payload() {
        let json = r#"{"active":[{"moves":[{"move":"Gyro Ball","id":"gyroball","pp":8,"maxpp":8,"target":"normal","disabled":false}]}],"side":{"name":"someuser","id":"p1","pokemon":[]}}"#;
        let frame = tokenize_frame(&format!("|request|{json}"));
        match parse_request(&frame.messages[0]).unwrap() {
            ServerMessage::Request(req) => {
                assert_eq!(req.side.id, "p1");
                let active = req.active.as_ref().unwrap();
                assert_eq!(active[0].moves[0].name, "Gyro Ball");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_request_is_raw() {
        let frame = tokenize_frame("|request|");
        match parse_request(&frame.messages[0]).unwrap() {
            ServerMessage::Raw(_) => {}
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_turn() {
        let frame = tokenize_frame("|turn|12");
        match parse_turn(&frame.messages[0]).unwrap() {
            ServerMessage::Turn(n) => assert_eq!(n, 12),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_turn_non_numeric_errors() {
        let frame = tokenize_frame("|turn|soon");
        assert!(parse_turn(&frame.messages[0]).is_err());
    }
}
