//! Battle initialization message parsers

use anyhow::Result;

use super::ServerMessage;
use super::battle::SideId;
use crate::ParseError;
use crate::frame::RawMessage;

/// Parse |player|PLAYER|USERNAME|AVATAR|RATING
pub fn parse_player(msg: &RawMessage) -> Result<ServerMessage> {
    let side = msg
        .field(2)
        .and_then(SideId::parse)
        .ok_or_else(|| ParseError::MissingField("player side".to_string()))?;

    let username = msg.field(3).unwrap_or_default().to_string();

    Ok(ServerMessage::Player { side, username })
}

/// Parse |init|FORMAT
pub fn parse_init(msg: &RawMessage) -> Result<ServerMessage> {
    let format = msg.field(2).unwrap_or_default().to_string();
    Ok(ServerMessage::Init { format })
}
