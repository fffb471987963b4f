//! Frame tokenizer
//!
//! One WebSocket frame can carry several newline-separated protocol lines,
//! optionally preceded by a `>ROOMID` marker line. The tokenizer splits a
//! frame into ordered messages without interpreting their tags; typed
//! parsing happens per message so one bad line never blocks the rest of
//! the frame.

/// A tokenized frame: room association plus the messages it carried,
/// in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub room_id: Option<String>,
    pub messages: Vec<RawMessage>,
}

/// One `|`-separated protocol line, fields in wire order.
///
/// For a line `|move|p1a: Pikachu|Thunderbolt`, `parts` is
/// `["", "move", "p1a: Pikachu", "Thunderbolt"]` - index 0 is the text
/// before the first delimiter, index 1 the tag.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    parts: Vec<String>,
}

impl RawMessage {
    /// The message tag (`move`, `-damage`, ...).
    pub fn tag(&self) -> &str {
        &self.parts[1]
    }

    /// Field by wire index (0 = pre-delimiter text, 1 = tag).
    pub fn field(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(String::as_str)
    }

    /// All fields in wire order.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Join fields from `index` onward; used for payloads that may
    /// themselves contain the delimiter (challstr, request JSON).
    pub fn tail(&self, index: usize) -> String {
        if index >= self.parts.len() {
            return String::new();
        }
        self.parts[index..].join("|")
    }

    /// Reconstruct the original line.
    pub fn raw(&self) -> String {
        self.parts.join("|")
    }
}

/// Tokenize a complete frame into ordered messages.
///
/// A line starting with `>` updates the frame's room association and does
/// not itself produce a message. Empty lines and lines that split into
/// fewer than two fields (plain text, protocol comments) are skipped.
pub fn tokenize_frame(frame: &str) -> Frame {
    let mut room_id = None;
    let mut messages = Vec::new();

    for line in frame.lines() {
        if line.is_empty() {
            continue;
        }

        if let Some(room) = line.strip_prefix('>') {
            room_id = Some(room.to_string());
            continue;
        }

        let parts: Vec<String> = line.split('|').map(str::to_string).collect();
        if parts.len() < 2 {
            continue;
        }

        messages.push(RawMessage { parts });
    }

    Frame { room_id, messages }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_room_marker() {
        let frame = tokenize_frame(">battle-gen9randombattle-123\n|init|battle\n|turn|1");
        assert_eq!(
            frame.room_id,
            Some("battle-gen9randombattle-123".to_string())
        );
        assert_eq!(frame.messages.len(), 2);
        assert_eq!(frame.messages[0].tag(), "init");
        assert_eq!(frame.messages[1].tag(), "turn");
    }

    #[test]
    fn test_tokenize_preserves_order_and_fields() {
        let frame = tokenize_frame("|move|p1a: Pikachu|Thunderbolt|p2a: Gyarados\n|-damage|p2a: Gyarados|12/100");
        assert_eq!(frame.messages.len(), 2);
        assert_eq!(
            frame.messages[0].parts(),
            &["", "move", "p1a: Pikachu", "Thunderbolt", "p2a: Gyarados"]
        );
        assert_eq!(frame.messages[1].field(2), Some("12/100"));
    }

    #[test]
    fn test_tokenize_skips_empty_and_comment_lines() {
        let frame = tokenize_frame("\nplain chat text\n\n|turn|2\n");
        assert_eq!(frame.room_id, None);
        assert_eq!(frame.messages.len(), 1);
        assert_eq!(frame.messages[0].tag(), "turn");
    }

    #[test]
    fn test_tail_rejoins_delimited_payload() {
        let frame = tokenize_frame("|challstr|4|abc123");
        assert_eq!(frame.messages[0].tail(2), "4|abc123");
    }
}
