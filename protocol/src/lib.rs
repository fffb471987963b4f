use thiserror::Error;

pub mod client;
pub mod frame;
pub mod request;
pub mod server;

pub use client::{ClientCommand, ClientMessage};
pub use frame::{Frame, RawMessage, tokenize_frame};
pub use request::{ActiveOptions, BaseStats, BattleRequest, MoveSlot, RequestPokemon, RequestSide};
pub use server::{ActorRef, BoostStat, HpStat, ServerMessage, SideId, parse_server_message};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}
