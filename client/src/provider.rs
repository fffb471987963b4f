//! Decision provider seam
//!
//! A provider turns one state snapshot into one action. Providers run in
//! a spawned task, so the context is an owned snapshot: the live state
//! keeps mutating while a decision is pending, and the provider acts on
//! what it was handed.

use anyhow::Result;
use futures_util::future::BoxFuture;
use sableye_battle::ActiveBattle;
use sableye_protocol::ClientCommand;

/// Snapshot handed to a provider for one decision.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    /// Formatted state report, the same text a human player would read
    pub text: String,
    /// The tracked state at the moment the decision was requested
    pub battle: ActiveBattle,
}

/// What kind of action the provider picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Move,
    Switch,
    TeraMove,
}

/// One chosen action: a kind plus a 1-based index into the legal move
/// list (moves) or the roster (switches).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub choice: u32,
}

impl Action {
    pub fn to_command(&self) -> ClientCommand {
        let choice = self.choice.to_string();
        match self.kind {
            ActionKind::Move => ClientCommand::ChooseMove(choice),
            ActionKind::Switch => ClientCommand::ChooseSwitch(choice),
            ActionKind::TeraMove => ClientCommand::ChooseTeraMove(choice),
        }
    }
}

/// Source of battle decisions.
///
/// Errors are caught by the session loop: the failure is logged and the
/// turn is skipped, leaving the battle timer to prompt a retry.
pub trait DecisionProvider: Send + Sync {
    fn decide(&self, ctx: DecisionContext) -> BoxFuture<'_, Result<Action>>;
}
