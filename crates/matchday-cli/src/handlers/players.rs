//! Player command handlers

use super::utils::Backend;
use crate::cli::{PlayersAction, PlayersArgs};
use crate::error::Result;
use crate::output::OutputWriter;
use matchday_core::types::{Abilities, ABILITY_KEYS};

/// Handle the players command
pub async fn handle_players(args: PlayersArgs, backend: &Backend, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        PlayersAction::List { all, space } => {
            let players = match (all, space) {
                (_, Some(space)) => {
                    backend
                        .request(
                            output,
                            "Loading players",
                            backend.api.players.list_in_space(&space, backend.cancel_token()),
                        )
                        .await?
                }
                (true, None) => {
                    backend
                        .request(
                            output,
                            "Loading players",
                            backend.api.players.list_all(backend.cancel_token()),
                        )
                        .await?
                }
                (false, None) => {
                    backend
                        .request(output, "Loading players", backend.api.players.list(backend.cancel_token()))
                        .await?
                }
            };
            output.players(&players)
        }
        PlayersAction::Get { id } => {
            let player = backend
                .request(output, "Loading player", backend.api.players.get(&id, backend.cancel_token()))
                .await?;
            output.data(&player)
        }
        PlayersAction::Skills { id, abilities } => {
            let abilities: Abilities = abilities.into_iter().collect();
            for key in abilities.keys().filter(|k| !ABILITY_KEYS.contains(&k.as_str())) {
                output.warning(&format!("'{}' is not a known ability; sending it anyway", key))?;
            }

            let player = backend
                .request(
                    output,
                    "Updating abilities",
                    backend.api.players.update_skills(&id, &abilities, backend.cancel_token()),
                )
                .await?;
            output.success(&format!("✓ Updated abilities of {}", player.name))?;
            output.data(&player)
        }
    }
}
