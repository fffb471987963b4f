//! Global (room-independent) message parsers

use anyhow::Result;

use super::ServerMessage;
use crate::ParseError;
use crate::frame::RawMessage;

/// Parse |challstr|CHALLSTR.
///
/// The challenge string itself contains `|`, so everything after the tag
/// is rejoined verbatim.
pub fn parse_challstr(msg: &RawMessage) -> Result<ServerMessage> {
    let challstr = msg.tail(2);
    if challstr.is_empty() {
        return Err(ParseError::MissingField("challstr".to_string()).into());
    }

    Ok(ServerMessage::Challstr(challstr))
}

/// Parse |updateuser|USER|NAMED|AVATAR|SETTINGS.
///
/// The username carries a leading rank character (a space when unranked),
/// which is not part of the name.
pub fn parse_updateuser(msg: &RawMessage) -> Result<ServerMessage> {
    let user = msg
        .field(2)
        .ok_or_else(|| ParseError::MissingField("username".to_string()))?;
    let username = user
        .strip_prefix(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(user)
        .to_string();
    let named = msg.field(3) == Some("1");

    Ok(ServerMessage::UpdateUser { username, named })
}

/// Parse |popup|MESSAGE
pub fn parse_popup(msg: &RawMessage) -> Result<ServerMessage> {
    Ok(ServerMessage::Popup(msg.tail(2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::tokenize_frame;

    #[test]
    fn test_parse_challstr_keeps_delimiters() {
        let frame = tokenize_frame("|challstr|4|aaaa|bbbb");
        match parse_challstr(&frame.messages[0]).unwrap() {
            ServerMessage::Challstr(s) => assert_eq!(s, "4|aaaa|bbbb"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_challstr_errors() {
        let frame = tokenize_frame("|challstr|");
        assert!(parse_challstr(&frame.messages[0]).is_err());
    }

    #[test]
    fn test_parse_updateuser() {
        let frame = tokenize_frame("|updateuser| someuser|1|265|{\"blockChallenges\":false}");
        match parse_updateuser(&frame.messages[0]).unwrap() {
            ServerMessage::UpdateUser { username, named } => {
                assert_eq!(username, "someuser");
                assert!(named);
            }
            other => panic!("unexpected message: {other:?}"),
        }

        let guest = tokenize_frame("|updateuser| Guest 137|0|169|{}");
        match parse_updateuser(&guest.messages[0]).unwrap() {
            ServerMessage::UpdateUser { username, named } => {
                assert_eq!(username, "Guest 137");
                assert!(!named);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_popup() {
        let frame = tokenize_frame("|popup|The user 'nobody' was not found.");
        match parse_popup(&frame.messages[0]).unwrap() {
            ServerMessage::Popup(s) => assert_eq!(s, "The user 'nobody' was not found."),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
