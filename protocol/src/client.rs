//! Commands that clients send to the server

/// A client-to-server command
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// /trn USERNAME,0,ASSERTION
    TrustedLogin { username: String, assertion: String },

    /// /search FORMAT
    Search(String),

    /// /challenge USERNAME, FORMAT
    Challenge { username: String, format: String },

    /// /choose move MOVE
    ChooseMove(String),

    /// /choose switch POKEMON
    ChooseSwitch(String),

    /// /choose move MOVE terastallize
    ChooseTeraMove(String),

    /// Raw command for catch-all
    Raw(String),
}

impl ClientCommand {
    /// Serialize command to protocol format
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::TrustedLogin {
                username,
                assertion,
            } => format!("/trn {},0,{}", username, assertion),
            Self::Search(format) => format!("/search {}", format),
            Self::Challenge { username, format } => format!("/challenge {}, {}", username, format),
            Self::ChooseMove(choice) => format!("/choose move {}", choice),
            Self::ChooseSwitch(choice) => format!("/choose switch {}", choice),
            Self::ChooseTeraMove(choice) => format!("/choose move {} terastallize", choice),
            Self::Raw(command) => command.clone(),
        }
    }
}

/// Client message with optional room context
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMessage {
    pub room_id: Option<String>,
    pub command: ClientCommand,
}

impl ClientMessage {
    pub fn global(command: ClientCommand) -> Self {
        Self {
            room_id: None,
            command,
        }
    }

    pub fn in_room(room_id: impl Into<String>, command: ClientCommand) -> Self {
        Self {
            room_id: Some(room_id.into()),
            command,
        }
    }

    /// Serialize to wire format: ROOMID|TEXT or |TEXT
    pub fn to_wire_format(&self) -> String {
        let text = self.command.to_protocol_string();
        match &self.room_id {
            Some(room) => format!("{}|{}", room, text),
            None => format!("|{}", text),
        }
    }
}
