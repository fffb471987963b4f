//! Random battle bot
//!
//! Searches for random battles and picks a random legal move each turn,
//! switching at random when the active pokemon is out of usable moves.
//!
//! Set SHOWDOWN_USERNAME / SHOWDOWN_PASSWORD to log in, SHOWDOWN_FORMAT
//! to pick a format, SHOWDOWN_CHALLENGE to challenge a user instead of
//! laddering.

use std::sync::Arc;

use anyhow::Result;
use futures_util::future::BoxFuture;
use rand::Rng;
use sableye_client::{Action, ActionKind, Client, Config, DecisionContext, DecisionProvider};

struct RandomProvider;

impl DecisionProvider for RandomProvider {
    fn decide(&self, ctx: DecisionContext) -> BoxFuture<'_, Result<Action>> {
        Box::pin(async move {
            println!("{}", ctx.text);

            let moves: Vec<usize> = ctx
                .battle
                .active
                .moves
                .iter()
                .enumerate()
                .filter(|(_, m)| !m.disabled)
                .map(|(i, _)| i + 1)
                .collect();

            let mut rng = rand::thread_rng();
            let action = if moves.is_empty() {
                let bench = ctx.battle.team.switch_candidates().len();
                anyhow::ensure!(bench > 0, "no usable moves and no switches");
                Action {
                    kind: ActionKind::Switch,
                    // Switch indices start at 2: slot 1 is the active pokemon
                    choice: rng.gen_range(2..=bench as u32 + 1),
                }
            } else {
                Action {
                    kind: ActionKind::Move,
                    choice: moves[rng.gen_range(0..moves.len())] as u32,
                }
            };

            println!("Choosing: {:?}", action);
            Ok(action)
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    println!(
        "Starting random bot ({})",
        config.username.as_deref().unwrap_or("guest")
    );

    Client::run(config, Arc::new(RandomProvider)).await
}
