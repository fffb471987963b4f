//! State transitions
//!
//! [`BattleTracker`] owns the battle store and the identity resolver, and
//! routes each typed server message to a per-tag transition function. The
//! transitions themselves are plain functions over `&mut ActiveBattle`
//! plus an already-resolved side, so each is testable in isolation.
//!
//! Every transition is total: missing or malformed fields degrade to
//! `None`/no-op, never to a panic, because one garbled line must not take
//! down tracking for the rest of the battle.

use sableye_protocol::request::BattleRequest;
use sableye_protocol::server::{ActorRef, BoostStat, HpStat, ServerMessage, condition_status};

use crate::identity::{IdentityResolver, Resolved};
use crate::state::{
    ActiveBattle, ActiveDetail, BattleState, DamageRecord, HpChangeKind, MoveOption, MoveRecord,
    OpponentActive, TeamMember,
};

/// Tracks one player's view of battles over a session.
///
/// The store lifecycle belongs exclusively to this struct: |init| replaces
/// the state wholesale, every battle tag mutates it through a transition,
/// and readers (the formatter, decision providers) only ever borrow it.
#[derive(Debug, Default)]
pub struct BattleTracker {
    pub state: BattleState,
    pub identity: IdentityResolver,
    username: Option<String>,
}

impl BattleTracker {
    pub fn new(username: Option<String>) -> Self {
        Self {
            state: BattleState::Uninitialized,
            identity: IdentityResolver::new(),
            username,
        }
    }

    /// Apply one server message to the tracked state.
    pub fn apply(&mut self, msg: &ServerMessage) {
        match msg {
            ServerMessage::Init { format } => {
                self.state = BattleState::Active(ActiveBattle::new(format.clone()));
                self.identity.reset();
            }

            // Guests learn their assigned name here, which is what the
            // |player| lines are matched against.
            ServerMessage::UpdateUser { username, .. } => {
                if !username.is_empty() {
                    self.username = Some(username.clone());
                }
            }

            ServerMessage::Player { side, username } => {
                if let Some(ours) = &self.username {
                    if user_id(username) == user_id(ours) {
                        self.identity.assign_side(*side);
                    }
                }
            }

            ServerMessage::Request(request) => {
                if let Some(side) = request.side.side() {
                    self.identity.assign_side(side);
                }
                if let Some(active) = request.side.active_pokemon() {
                    self.identity.set_our_active_name(active.name());
                }
                if let Some(battle) = self.state.battle_mut() {
                    apply_request(battle, request);
                }
            }

            ServerMessage::Switch {
                actor,
                details,
                condition,
            } => {
                let resolved = self.identity.note_switch(actor);
                if let Some(battle) = self.state.battle_mut() {
                    apply_switch(battle, resolved, actor, details, condition);
                }
            }

            ServerMessage::Move { actor, move_name } => {
                let resolved = self.identity.resolve(actor);
                if let Some(battle) = self.state.battle_mut() {
                    apply_move(battle, resolved, actor, move_name);
                }
            }

            ServerMessage::Status { actor, status } => {
                let resolved = self.identity.resolve(actor);
                if let Some(battle) = self.state.battle_mut() {
                    apply_status(battle, resolved, status);
                }
            }

            ServerMessage::Boost { actor, stat, delta } => {
                let resolved = self.identity.resolve(actor);
                if let Some(battle) = self.state.battle_mut() {
                    apply_boost(battle, resolved, stat, *delta);
                }
            }

            ServerMessage::Damage {
                actor,
                condition,
                reason,
            } => {
                let resolved = self.identity.resolve(actor);
                if let Some(battle) = self.state.battle_mut() {
                    apply_hp_change(
                        battle,
                        resolved,
                        HpChangeKind::Damage,
                        actor,
                        condition,
                        reason.as_deref(),
                    );
                }
            }

            ServerMessage::Heal {
                actor,
                condition,
                reason,
            } => {
                let resolved = self.identity.resolve(actor);
                if let Some(battle) = self.state.battle_mut() {
                    apply_hp_change(
                        battle,
                        resolved,
                        HpChangeKind::Heal,
                        actor,
                        condition,
                        reason.as_deref(),
                    );
                }
            }

            ServerMessage::Weather(weather) => {
                if let Some(battle) = self.state.battle_mut() {
                    apply_weather(battle, weather);
                }
            }

            ServerMessage::FieldChange(condition) => {
                if let Some(battle) = self.state.battle_mut() {
                    battle.field.apply(condition);
                }
            }

            ServerMessage::Turn(number) => {
                if let Some(battle) = self.state.battle_mut() {
                    battle.turn = *number;
                }
            }

            // Handled at the session layer; no tracked state changes.
            ServerMessage::Win(_)
            | ServerMessage::Challstr(_)
            | ServerMessage::Inactive(_)
            | ServerMessage::Popup(_)
            | ServerMessage::Raw(_) => {}
        }
    }

    /// Mark terastallization as spent for the rest of the battle.
    pub fn mark_tera_used(&mut self) {
        if let Some(battle) = self.state.battle_mut() {
            battle.active.tera_used = true;
        }
    }
}

/// Normalized user id: lowercase alphanumerics only, the way the server
/// compares names.
fn user_id(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Rebuild our roster and active detail from a request payload.
///
/// The roster is authoritative and replaced wholesale. Boosts and
/// volatiles reset when the request shows a new stint; the tera-used flag
/// survives for the battle.
pub fn apply_request(battle: &mut ActiveBattle, request: &BattleRequest) {
    battle.team.members = request
        .side
        .pokemon
        .iter()
        .map(TeamMember::from_request)
        .collect();
    battle.team.active_index = request.side.pokemon.iter().position(|p| p.active);

    if battle.team.active_index.is_some() {
        let options = request.active.as_ref().and_then(|slots| slots.first());
        battle.active = ActiveDetail {
            moves: options
                .map(|o| {
                    o.moves
                        .iter()
                        .map(|m| MoveOption {
                            name: m.name.clone(),
                            disabled: m.disabled,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            can_switch: options.is_none_or(|o| !o.trapped),
            boosts: Default::default(),
            volatiles: Vec::new(),
            tera_used: battle.active.tera_used,
        };
    }
}

/// A switch by the opponent replaces their active snapshot and extends the
/// known-team ledger; our own switches are tracked through requests.
pub fn apply_switch(
    battle: &mut ActiveBattle,
    resolved: Resolved,
    actor: &ActorRef,
    details: &str,
    condition: &str,
) {
    if resolved == Resolved::Theirs {
        battle.opponent.active = OpponentActive {
            name: Some(actor.name.clone()),
            details: Some(details.to_string()),
            condition: Some(condition.to_string()),
            status: condition_status(condition),
            moves: Vec::new(),
            boosts: Default::default(),
        };
        battle.opponent.reveal(&actor.name, details, battle.turn);
    }
}

/// Record a move in the global history; opponent moves also update their
/// known-move set and last-move marker.
pub fn apply_move(battle: &mut ActiveBattle, resolved: Resolved, actor: &ActorRef, move_name: &str) {
    if resolved == Resolved::Theirs {
        battle.opponent.last_move = Some(move_name.to_string());
        if !battle
            .opponent
            .active
            .moves
            .iter()
            .any(|m| m == move_name)
        {
            battle.opponent.active.moves.push(move_name.to_string());
        }
    }

    battle.move_history.push(MoveRecord {
        turn: battle.turn,
        actor: actor.name.clone(),
        move_name: move_name.to_string(),
    });
}

pub fn apply_status(battle: &mut ActiveBattle, resolved: Resolved, status: &str) {
    match resolved {
        Resolved::Ours => {
            if let Some(member) = battle.team.active_mut() {
                member.status = Some(status.to_string());
            }
        }
        Resolved::Theirs => {
            battle.opponent.active.status = Some(status.to_string());
        }
    }
}

/// Add a signed stage delta to the resolved side's boost table. Stat keys
/// outside the boost vocabulary are ignored.
pub fn apply_boost(battle: &mut ActiveBattle, resolved: Resolved, stat: &str, delta: i32) {
    let Some(stat) = BoostStat::parse(stat) else {
        return;
    };

    match resolved {
        Resolved::Ours => battle.active.boosts.apply(stat, delta),
        Resolved::Theirs => battle.opponent.active.boosts.apply(stat, delta),
    }
}

/// Apply a |-damage| or |-heal| to the resolved side and log it.
pub fn apply_hp_change(
    battle: &mut ActiveBattle,
    resolved: Resolved,
    kind: HpChangeKind,
    actor: &ActorRef,
    condition: &str,
    reason: Option<&str>,
) {
    match resolved {
        Resolved::Ours => {
            if let Some(member) = battle.team.active_mut() {
                member.hp = HpStat::parse(condition);
            }
        }
        Resolved::Theirs => {
            battle.opponent.active.condition = Some(condition.to_string());
            battle.opponent.last_hp_change = Some(kind);
        }
    }

    battle.damage_history.push(DamageRecord {
        kind,
        target: actor.name.clone(),
        condition: condition.to_string(),
        reason: reason.map(str::to_string),
    });
}

/// Overwrite the weather; the server reports "none" when it runs out.
pub fn apply_weather(battle: &mut ActiveBattle, weather: &str) {
    battle.weather = if weather.is_empty() || weather.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(weather.to_string())
    };
}
