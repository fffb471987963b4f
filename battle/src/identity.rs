//! Side and identity resolution
//!
//! The stream names actors by side-qualified display name, and nothing
//! else ties a line to "us" or "them". This resolver owns the two facts
//! that make attribution possible: which side marker is ours (learned
//! once per battle) and the display name of our current active pokemon
//! (updated on every switch of our own side).

use sableye_protocol::server::{ActorRef, SideId};

/// Which participant a message's actor resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Ours,
    Theirs,
}

/// Per-battle identity state.
///
/// Before the side marker or active name is learned, actors default to
/// `Theirs`; an opponent whose active shares our active's display name is
/// resolved by side marker when one is present, otherwise misattributed.
/// Those are known limits of what the stream exposes, not bugs to patch
/// around.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    our_side: Option<SideId>,
    our_active_name: Option<String>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record our side marker. First assignment wins for the battle.
    pub fn assign_side(&mut self, side: SideId) {
        if self.our_side.is_none() {
            self.our_side = Some(side);
        }
    }

    pub fn our_side(&self) -> Option<SideId> {
        self.our_side
    }

    pub fn our_active_name(&self) -> Option<&str> {
        self.our_active_name.as_deref()
    }

    /// Record our active pokemon's display name directly (from a request
    /// roster, which is always our own side).
    pub fn set_our_active_name(&mut self, name: impl Into<String>) {
        self.our_active_name = Some(name.into());
    }

    /// Observe a switch event. Returns the resolution for this actor and,
    /// when it is ours, updates the stored active name.
    pub fn note_switch(&mut self, actor: &ActorRef) -> Resolved {
        let resolved = self.resolve(actor);
        if resolved == Resolved::Ours {
            self.our_active_name = Some(actor.name.clone());
        }
        resolved
    }

    /// Attribute an actor. The side marker is authoritative when both it
    /// and our own side are known; otherwise fall back to comparing the
    /// actor's name against our stored active name.
    pub fn resolve(&self, actor: &ActorRef) -> Resolved {
        if let (Some(ours), Some(theirs_or_ours)) = (self.our_side, actor.side) {
            return if ours == theirs_or_ours {
                Resolved::Ours
            } else {
                Resolved::Theirs
            };
        }

        match &self.our_active_name {
            Some(name) if *name == actor.name => Resolved::Ours,
            _ => Resolved::Theirs,
        }
    }

    /// Forget everything; called when a new battle room opens.
    pub fn reset(&mut self) {
        self.our_side = None;
        self.our_active_name = None;
    }
}
