//! Async Pokemon Showdown battle client.
//!
//! Connects to a Showdown server, logs in (or plays as a guest), keeps a
//! [`sableye_battle`] tracker up to date from the message stream, and asks
//! a [`DecisionProvider`] for an action each turn.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sableye_client::{Client, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(MyProvider);
//!     Client::run(Config::from_env(), provider).await
//! }
//! ```

mod auth;
mod config;
mod connection;
mod provider;
mod session;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

pub use config::{Config, DEFAULT_FORMAT};
pub use connection::{Connection, ReconnectPolicy};
pub use provider::{Action, ActionKind, DecisionContext, DecisionProvider};
pub use session::{Session, SessionPhase};

pub use sableye_battle::{ActiveBattle, BattleTracker};
pub use sableye_protocol::{ClientCommand, ClientMessage, Frame, ServerMessage};

pub const SHOWDOWN_URL: &str = "wss://sim3.psim.us/showdown/websocket";

/// The client: one connection, one session, one decision provider.
pub struct Client;

impl Client {
    /// Connect to the default server and run the session until the
    /// connection is permanently lost.
    pub async fn run(config: Config, provider: Arc<dyn DecisionProvider>) -> Result<()> {
        Self::run_with_url(SHOWDOWN_URL, config, provider).await
    }

    /// Connect to a specific server and run the session.
    pub async fn run_with_url(
        url: &str,
        config: Config,
        provider: Arc<dyn DecisionProvider>,
    ) -> Result<()> {
        let mut connection =
            Connection::connect(url.to_string(), ReconnectPolicy::default()).await?;

        let (outgoing_tx, mut outgoing_rx) = mpsc::unbounded_channel::<String>();
        let (decision_tx, mut decision_rx) = mpsc::unbounded_channel();

        let mut session = Session::new(config, provider, outgoing_tx, decision_tx);
        session.connected();

        loop {
            tokio::select! {
                frame = connection.recv() => {
                    session.handle_frame(&frame?);
                }
                Some(wire) = outgoing_rx.recv() => {
                    tracing::debug!(message = %wire, "Sending");
                    if let Err(e) = connection.send(wire).await {
                        tracing::warn!(error = %e, "Send failed, message dropped");
                    }
                }
                Some(action) = decision_rx.recv() => {
                    session.complete_decision(action);
                }
            }
        }
    }
}
