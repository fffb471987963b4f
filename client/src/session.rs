//! Session dispatcher
//!
//! Owns the battle tracker and the session-phase machine, and turns
//! frames into state updates plus outbound commands. Frames are handled
//! synchronously and in order; the only asynchronous work is the login
//! handshake and the decision cycle, both spawned so the stream never
//! blocks on them.

use std::sync::Arc;

use sableye_battle::{BattleTracker, format};
use sableye_protocol::{
    ClientCommand, ClientMessage, Frame, ServerMessage, parse_server_message,
};
use tokio::sync::mpsc;

use crate::auth;
use crate::config::Config;
use crate::provider::{Action, ActionKind, DecisionContext, DecisionProvider};

/// Where the session currently is in its lifecycle.
///
/// `Authenticating` holds until the server's |updateuser| confirms the
/// login. `Guest` and `BattleEnded` are transient: a guest challstr and
/// a |win| each land in `AwaitingBattle` within the same message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    AwaitingChallenge,
    Authenticating,
    Guest,
    AwaitingBattle,
    InBattle,
    BattleEnded,
}

pub struct Session {
    phase: SessionPhase,
    tracker: BattleTracker,
    config: Config,
    outgoing: mpsc::UnboundedSender<String>,
    decisions: mpsc::UnboundedSender<Action>,
    provider: Arc<dyn DecisionProvider>,
    battle_room: Option<String>,
    team_shown: bool,
}

impl Session {
    pub fn new(
        config: Config,
        provider: Arc<dyn DecisionProvider>,
        outgoing: mpsc::UnboundedSender<String>,
        decisions: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            phase: SessionPhase::Disconnected,
            tracker: BattleTracker::new(config.username.clone()),
            config,
            outgoing,
            decisions,
            provider,
            battle_room: None,
            team_shown: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn tracker(&self) -> &BattleTracker {
        &self.tracker
    }

    /// The transport is up; the server's challenge is the next event.
    pub fn connected(&mut self) {
        self.phase = SessionPhase::AwaitingChallenge;
    }

    /// Handle one frame: update the room association, then every message
    /// in order. A message that fails to parse is logged and skipped
    /// without affecting the rest of the frame.
    pub fn handle_frame(&mut self, frame: &Frame) {
        if let Some(room) = &frame.room_id {
            if room.starts_with("battle-") {
                self.battle_room = Some(room.clone());
            }
        }

        for raw in &frame.messages {
            match parse_server_message(raw) {
                Ok(msg) => self.handle_message(&msg),
                Err(e) => {
                    tracing::warn!(line = %raw.raw(), error = %e, "Skipping unparseable message");
                }
            }
        }
    }

    fn handle_message(&mut self, msg: &ServerMessage) {
        self.tracker.apply(msg);

        match msg {
            ServerMessage::Challstr(challstr) => self.handle_challstr(challstr),

            ServerMessage::UpdateUser { username, named } => {
                // The server's confirmation that the login handshake took;
                // the tracker has already picked up the name.
                if *named && self.phase == SessionPhase::Authenticating {
                    tracing::info!(user = %username, "Logged in");
                    self.phase = SessionPhase::AwaitingBattle;
                }
            }

            ServerMessage::Init { .. } => {
                self.phase = SessionPhase::InBattle;
                self.team_shown = false;
                // The room tells us only that a battle opened; the format
                // is the one we queued for.
                if let Some(battle) = self.tracker.state.battle_mut() {
                    battle.format = self.config.format.clone();
                }
                tracing::info!(room = ?self.battle_room, "Battle started");
            }

            ServerMessage::Request(_) => {
                if !self.team_shown {
                    if let Some(battle) = self.tracker.state.battle() {
                        if !battle.team.members.is_empty() {
                            tracing::info!("{}", format::team_overview(&battle.team));
                            self.team_shown = true;
                        }
                    }
                }
            }

            ServerMessage::Turn(number) => {
                tracing::debug!(turn = number, "New turn");
                self.trigger_decision();
            }

            ServerMessage::Inactive(text) => {
                // The battle timer nags until a choice lands; use it to
                // retry decisions that failed or got lost.
                if text.starts_with("Time left:") {
                    self.trigger_decision();
                }
            }

            ServerMessage::Win(winner) => {
                tracing::info!(winner = %winner, "Battle ended");
                self.phase = SessionPhase::BattleEnded;
                self.battle_room = None;
                self.queue_next_battle();
            }

            ServerMessage::Popup(text) => {
                let lowered = text.to_lowercase();
                if lowered.contains("user") && lowered.contains("not found") {
                    tracing::warn!(popup = %text, "Challenge target not found, searching instead");
                    self.send_global(ClientCommand::Search(self.config.format.clone()));
                }
            }

            // State-only tags, already applied by the tracker.
            _ => {}
        }
    }

    fn handle_challstr(&mut self, challstr: &str) {
        if self.config.has_credentials() {
            self.phase = SessionPhase::Authenticating;

            let username = self.config.username.clone().unwrap_or_default();
            let password = self.config.password.clone().unwrap_or_default();
            let challstr = challstr.to_string();
            let outgoing = self.outgoing.clone();
            let matchmaking = self.matchmaking_command();

            tokio::spawn(async move {
                match auth::get_assertion(&username, &password, &challstr).await {
                    Ok(assertion) => {
                        let login = ClientMessage::global(ClientCommand::TrustedLogin {
                            username,
                            assertion,
                        });
                        let _ = outgoing.send(login.to_wire_format());
                        let _ = outgoing.send(matchmaking.to_wire_format());
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Login failed, playing as guest");
                        let _ = outgoing.send(matchmaking.to_wire_format());
                    }
                }
            });
        } else {
            self.phase = SessionPhase::Guest;
            tracing::info!("No credentials configured, playing as guest");
            let matchmaking = self.matchmaking_command();
            self.send_wire(matchmaking.to_wire_format());
            // Guests need no handshake, so matchmaking is already queued.
            self.phase = SessionPhase::AwaitingBattle;
        }
    }

    fn matchmaking_command(&self) -> ClientMessage {
        match &self.config.challenge_user {
            Some(user) => ClientMessage::global(ClientCommand::Challenge {
                username: user.clone(),
                format: self.config.format.clone(),
            }),
            None => ClientMessage::global(ClientCommand::Search(self.config.format.clone())),
        }
    }

    fn queue_next_battle(&mut self) {
        self.phase = SessionPhase::AwaitingBattle;

        let outgoing = self.outgoing.clone();
        let matchmaking = self.matchmaking_command();
        tokio::spawn(async move {
            // Give the server a moment to close out the finished battle
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            let _ = outgoing.send(matchmaking.to_wire_format());
        });
    }

    /// Kick off one decision cycle on a snapshot of the current state.
    ///
    /// The provider runs in its own task; frames keep flowing and keep
    /// mutating the live state meanwhile. The action comes back through
    /// the decisions channel and is sent by [`complete_decision`].
    ///
    /// [`complete_decision`]: Session::complete_decision
    fn trigger_decision(&self) {
        let Some(battle) = self.tracker.state.battle() else {
            return;
        };
        // A forced switch (fainted active, U-turn, etc.) arrives with no
        // moves at all, so a bench with live members still needs an answer.
        if battle.active.moves.is_empty() && battle.team.switch_candidates().is_empty() {
            return;
        }

        let ctx = DecisionContext {
            text: format::render(battle),
            battle: battle.clone(),
        };
        let provider = Arc::clone(&self.provider);
        let decisions = self.decisions.clone();

        tokio::spawn(async move {
            match provider.decide(ctx).await {
                Ok(action) => {
                    let _ = decisions.send(action);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Decision provider failed, skipping turn");
                }
            }
        });
    }

    /// Send a completed decision to the server.
    pub fn complete_decision(&mut self, action: Action) {
        if self.phase != SessionPhase::InBattle {
            tracing::debug!(?action, "Dropping decision, battle no longer active");
            return;
        }

        if action.kind == ActionKind::TeraMove {
            self.tracker.mark_tera_used();
        }

        let message = match &self.battle_room {
            Some(room) => ClientMessage::in_room(room.clone(), action.to_command()),
            None => ClientMessage::global(action.to_command()),
        };
        self.send_wire(message.to_wire_format());
    }

    fn send_global(&self, command: ClientCommand) {
        self.send_wire(ClientMessage::global(command).to_wire_format());
    }

    /// Fire-and-forget send; a closed channel is logged, not fatal.
    fn send_wire(&self, wire: String) {
        if self.outgoing.send(wire.clone()).is_err() {
            tracing::warn!(message = %wire, "Outgoing channel closed, message not sent");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use futures_util::future::BoxFuture;
    use sableye_protocol::tokenize_frame;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct FixedProvider(Action);

    impl DecisionProvider for FixedProvider {
        fn decide(&self, _ctx: DecisionContext) -> BoxFuture<'_, Result<Action>> {
            let action = self.0;
            Box::pin(async move { Ok(action) })
        }
    }

    fn session_with(
        config: Config,
    ) -> (
        Session,
        UnboundedReceiver<String>,
        UnboundedReceiver<Action>,
    ) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (decision_tx, decision_rx) = mpsc::unbounded_channel();
        let provider = Arc::new(FixedProvider(Action {
            kind: ActionKind::Move,
            choice: 1,
        }));
        let mut session = Session::new(config, provider, out_tx, decision_tx);
        session.connected();
        (session, out_rx, decision_rx)
    }

    fn guest_config() -> Config {
        Config {
            format: "gen9randombattle".to_string(),
            ..Config::default()
        }
    }

    const REQUEST: &str = r#"{"active": [{"moves": [{"move": "Gyro Ball", "id": "gyroball", "pp": 8, "maxpp": 8, "target": "normal", "disabled": false}]}], "side": {"name": "someuser", "id": "p1", "pokemon": [{"ident": "p1: Bronzong", "details": "Bronzong, L82", "condition": "250/250", "active": true}]}}"#;

    #[tokio::test]
    async fn test_guest_challstr_searches_immediately() {
        let (mut session, mut out_rx, _) = session_with(guest_config());

        session.handle_frame(&tokenize_frame("|challstr|4|abc"));

        assert_eq!(session.phase(), SessionPhase::AwaitingBattle);
        assert_eq!(out_rx.recv().await.unwrap(), "|/search gen9randombattle");
    }

    #[tokio::test]
    async fn test_challenge_config_challenges_instead() {
        let config = Config {
            challenge_user: Some("rival".to_string()),
            ..guest_config()
        };
        let (mut session, mut out_rx, _) = session_with(config);

        session.handle_frame(&tokenize_frame("|challstr|4|abc"));
        assert_eq!(
            out_rx.recv().await.unwrap(),
            "|/challenge rival, gen9randombattle"
        );
    }

    #[tokio::test]
    async fn test_turn_triggers_decision_and_room_scoped_send() {
        let (mut session, mut out_rx, mut decision_rx) = session_with(guest_config());

        session.handle_frame(&tokenize_frame(
            ">battle-gen9randombattle-42\n|init|battle",
        ));
        assert_eq!(session.phase(), SessionPhase::InBattle);

        session.handle_frame(&tokenize_frame(&format!(
            ">battle-gen9randombattle-42\n|request|{REQUEST}"
        )));
        session.handle_frame(&tokenize_frame(">battle-gen9randombattle-42\n|turn|1"));

        let action = decision_rx.recv().await.unwrap();
        session.complete_decision(action);

        assert_eq!(
            out_rx.recv().await.unwrap(),
            "battle-gen9randombattle-42|/choose move 1"
        );
    }

    const FORCED_SWITCH_REQUEST: &str = r#"{"forceSwitch": [true], "side": {"name": "someuser", "id": "p1", "pokemon": [{"ident": "p1: Bronzong", "details": "Bronzong, L82", "condition": "0 fnt", "active": true}, {"ident": "p1: Heatran", "details": "Heatran, L79", "condition": "240/240", "active": false}]}}"#;

    #[tokio::test]
    async fn test_forced_switch_triggers_decision() {
        let (mut session, _out_rx, mut decision_rx) = session_with(guest_config());

        session.handle_frame(&tokenize_frame(
            ">battle-gen9randombattle-42\n|init|battle",
        ));
        // A fainted active leaves no moves, only the bench
        session.handle_frame(&tokenize_frame(&format!(
            ">battle-gen9randombattle-42\n|request|{FORCED_SWITCH_REQUEST}"
        )));
        session.handle_frame(&tokenize_frame(
            ">battle-gen9randombattle-42\n|inactive|Time left: 120 sec this turn",
        ));

        assert!(decision_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_credentials_hold_authenticating_until_confirmed() {
        let config = Config {
            username: Some("someuser".to_string()),
            password: Some("hunter2".to_string()),
            ..guest_config()
        };
        let (mut session, _out_rx, _) = session_with(config);

        session.handle_frame(&tokenize_frame("|challstr|4|abc"));
        assert_eq!(session.phase(), SessionPhase::Authenticating);

        session.handle_frame(&tokenize_frame("|updateuser| someuser|1|265|{}"));
        assert_eq!(session.phase(), SessionPhase::AwaitingBattle);
    }

    #[tokio::test]
    async fn test_turn_without_moves_skips_decision() {
        let (mut session, _out_rx, mut decision_rx) = session_with(guest_config());

        session.handle_frame(&tokenize_frame(
            ">battle-gen9randombattle-42\n|init|battle\n|turn|1",
        ));

        assert!(decision_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_win_returns_to_matchmaking() {
        let (mut session, mut out_rx, _) = session_with(guest_config());

        session.handle_frame(&tokenize_frame(
            ">battle-gen9randombattle-42\n|init|battle\n|win|rival",
        ));

        assert_eq!(session.phase(), SessionPhase::AwaitingBattle);
        // Search goes out after the post-battle delay
        assert_eq!(out_rx.recv().await.unwrap(), "|/search gen9randombattle");
    }

    #[tokio::test]
    async fn test_decision_dropped_after_battle_ends() {
        let (mut session, mut out_rx, mut decision_rx) = session_with(guest_config());

        session.handle_frame(&tokenize_frame(
            ">battle-gen9randombattle-42\n|init|battle",
        ));
        session.handle_frame(&tokenize_frame(&format!(
            ">battle-gen9randombattle-42\n|request|{REQUEST}"
        )));
        session.handle_frame(&tokenize_frame(">battle-gen9randombattle-42\n|turn|1"));
        let action = decision_rx.recv().await.unwrap();

        session.handle_frame(&tokenize_frame(
            ">battle-gen9randombattle-42\n|win|rival",
        ));
        // Drain the re-queue search so we can assert nothing else arrives
        assert_eq!(out_rx.recv().await.unwrap(), "|/search gen9randombattle");

        session.complete_decision(action);
        assert!(out_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unparseable_line_does_not_block_frame() {
        let (mut session, _out_rx, _) = session_with(guest_config());

        session.handle_frame(&tokenize_frame(
            ">battle-gen9randombattle-42\n|init|battle\n|turn|notanumber\n|turn|5",
        ));

        let battle = session.tracker().state.battle().unwrap();
        assert_eq!(battle.turn, 5);
    }

    #[tokio::test]
    async fn test_popup_user_not_found_falls_back_to_search() {
        let config = Config {
            challenge_user: Some("ghost".to_string()),
            ..guest_config()
        };
        let (mut session, mut out_rx, _) = session_with(config);

        session.handle_frame(&tokenize_frame(
            "|popup|The user 'ghost' was not found.",
        ));
        assert_eq!(out_rx.recv().await.unwrap(), "|/search gen9randombattle");
    }
}
