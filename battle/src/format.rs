//! Textual state snapshot
//!
//! Renders the tracked battle into the plain-text report handed to
//! decision providers. Rendering is pure and deterministic: the same
//! state always produces the same text, and every section checks its own
//! preconditions and is omitted whole when its data is missing.

use std::fmt::Write;

use crate::boosts::BoostTable;
use crate::state::{ActiveBattle, Team};

const DIVIDER_LEN: usize = 60;

fn divider() -> String {
    "\u{2500}".repeat(DIVIDER_LEN)
}

fn boost_list(boosts: &BoostTable) -> Option<String> {
    let nonzero = boosts.nonzero();
    if nonzero.is_empty() {
        return None;
    }
    Some(
        nonzero
            .iter()
            .map(|&(stat, stage)| format!("{} {:+}", stat.as_str(), stage))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Render the full battle snapshot.
pub fn render(battle: &ActiveBattle) -> String {
    let mut out = String::new();

    let _ = write!(out, "\n{0}\nTURN {1}\n{0}\n", divider(), battle.turn);

    write_battlefield_conditions(&mut out, battle);
    write_our_active(&mut out, battle);
    write_available_switches(&mut out, battle);
    write_opponent(&mut out, battle);
    write_move_history(&mut out, battle);

    out.push_str(&divider());
    out
}

fn write_battlefield_conditions(out: &mut String, battle: &ActiveBattle) {
    let mut conditions = Vec::new();
    if let Some(weather) = &battle.weather {
        conditions.push(format!("Weather: {weather}"));
    }
    if let Some(terrain) = &battle.terrain {
        conditions.push(format!("Terrain: {terrain}"));
    }
    let hazards = battle.field.summary();
    if !hazards.is_empty() {
        conditions.push(format!("Field: {}", hazards.join(", ")));
    }

    if conditions.is_empty() {
        return;
    }

    out.push_str("\nBATTLEFIELD CONDITIONS:\n");
    for condition in conditions {
        let _ = writeln!(out, "\u{2022} {condition}");
    }
}

fn write_our_active(out: &mut String, battle: &ActiveBattle) {
    let Some(active) = battle.team.active() else {
        return;
    };

    out.push_str("\nYOUR ACTIVE POKEMON:\n");
    let _ = writeln!(out, "\u{2022} {}", active.details);

    if let Some(hp) = active.hp {
        let _ = write!(out, "  HP: {}/{}", hp.current, hp.max);
        if let Some(status) = &active.status {
            let _ = write!(out, " [{status}]");
        }
        out.push('\n');
    }
    if !active.ability.is_empty() {
        let _ = writeln!(out, "  Ability: {}", active.ability);
    }
    if !active.item.is_empty() {
        let _ = writeln!(out, "  Item: {}", active.item);
    }

    if let Some(boosts) = boost_list(&battle.active.boosts) {
        let _ = writeln!(out, "  Boosts: {boosts}");
    }

    if !battle.active.moves.is_empty() {
        out.push_str("  Moves:\n");
        for (i, slot) in battle.active.moves.iter().enumerate() {
            let marker = if slot.disabled { " [DISABLED]" } else { "" };
            let _ = writeln!(out, "    {}. {:<20}{marker}", i + 1, slot.name);
        }
    }
}

fn write_available_switches(out: &mut String, battle: &ActiveBattle) {
    let candidates = battle.team.switch_candidates();
    if candidates.is_empty() {
        return;
    }

    out.push_str("\nAVAILABLE SWITCHES:\n");
    for (i, member) in candidates.iter().enumerate() {
        let _ = write!(out, "\u{2022} s{}: {:<20} | ", i + 1, member.details);
        match member.hp {
            Some(hp) => {
                let _ = write!(out, "HP: {}/{}", hp.current, hp.max);
            }
            None => out.push_str("HP: unknown"),
        }
        if let Some(status) = &member.status {
            let _ = write!(out, " [{status}]");
        }
        out.push('\n');
    }
}

fn write_opponent(out: &mut String, battle: &ActiveBattle) {
    let opponent = &battle.opponent;
    let Some(name) = &opponent.active.name else {
        return;
    };

    out.push_str("\nOPPONENT'S POKEMON:\n");
    let _ = write!(out, "\u{2022} {name}");
    if let Some(details) = &opponent.active.details {
        let _ = write!(out, " ({details})");
    }
    out.push('\n');

    if let Some(condition) = &opponent.active.condition {
        let _ = writeln!(out, "  HP: {condition}");
    }
    if let Some(status) = &opponent.active.status {
        let _ = writeln!(out, "  Status: {status}");
    }
    if let Some(boosts) = boost_list(&opponent.active.boosts) {
        let _ = writeln!(out, "  Boosts: {boosts}");
    }
    if !opponent.active.moves.is_empty() {
        let _ = writeln!(out, "  Known moves: {}", opponent.active.moves.join(", "));
    }
    if let Some(last_move) = &opponent.last_move {
        let _ = writeln!(out, "  Last move: {last_move}");
    }
}

fn write_move_history(out: &mut String, battle: &ActiveBattle) {
    if battle.move_history.is_empty() {
        return;
    }

    out.push_str("\nLAST MOVES:\n");
    let start = battle.move_history.len().saturating_sub(2);
    for record in &battle.move_history[start..] {
        let _ = writeln!(out, "\u{2022} {} used {}", record.actor, record.move_name);
    }
}

/// Render the roster overview shown once per battle when the first
/// request arrives.
pub fn team_overview(team: &Team) -> String {
    let mut out = String::from("\n=== YOUR TEAM ===\n");

    for (i, member) in team.members.iter().enumerate() {
        let hp = match member.hp {
            Some(hp) => format!("{}/{}", hp.current, hp.max),
            None => "fainted".to_string(),
        };
        let ability = if member.ability.is_empty() {
            "No ability"
        } else {
            &member.ability
        };
        let item = if member.item.is_empty() {
            "No item"
        } else {
            &member.item
        };
        let moves = if member.moves.is_empty() {
            "Unknown".to_string()
        } else {
            member.moves.join(", ")
        };
        let _ = writeln!(
            out,
            "{}. {:<20} | {:<15} | {:<15} | HP: {} | Moves: {}",
            i + 1,
            member.details,
            ability,
            item,
            hp,
            moves
        );
    }

    out
}
