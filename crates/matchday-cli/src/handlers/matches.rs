//! Match command handlers

use super::utils::Backend;
use crate::cli::{MatchesAction, MatchesArgs, OutputFormat};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use serde_json::json;

/// Handle the matches command
pub async fn handle_matches(args: MatchesArgs, backend: &Backend, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        MatchesAction::List { group } => {
            let response = backend
                .request(
                    output,
                    "Loading matches",
                    backend.api.matches.list_by_group(&group, backend.cancel_token()),
                )
                .await?;

            if output.format() == OutputFormat::Human {
                output.matches(&response.matches)?;
                if response.meta.can_create {
                    output.info(&format!("Schedule a new one with `matchday matches create {}`", group))?;
                }
                Ok(())
            } else {
                output.data(&response)
            }
        }
        MatchesAction::Create { group, players, at } => {
            let players = players
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>();
            if players.len() < 2 {
                return Err(Error::invalid_args("a match needs at least two players"));
            }

            let created = backend
                .request(
                    output,
                    "Scheduling match",
                    backend.api.matches.create(&group, players, at, backend.cancel_token()),
                )
                .await?;

            if output.format() == OutputFormat::Human {
                output.success(&format!("✓ Scheduled match {}", created.id))
            } else {
                output.data(&created)
            }
        }
        MatchesAction::Teams { id, ai, seed } => {
            let response = backend
                .request(
                    output,
                    "Generating teams",
                    backend.api.matches.generate_teams(&id, ai, seed, backend.cancel_token()),
                )
                .await?;

            output.section("Teams")?;
            output.teams(&response.teams)
        }
        MatchesAction::Finalize {
            id,
            score_a,
            score_b,
            no_ratings,
        } => {
            let finalized = backend
                .request(
                    output,
                    "Recording result",
                    backend.api.matches.finalize(&id, score_a, score_b, backend.cancel_token()),
                )
                .await?;
            output.success(&format!("✓ Final score {} - {}", score_a, score_b))?;

            if no_ratings {
                return if output.format() == OutputFormat::Human {
                    Ok(())
                } else {
                    output.data(&finalized)
                };
            }

            let ratings = backend
                .request(
                    output,
                    "Applying ratings",
                    backend.api.matches.apply_ratings(&id, backend.cancel_token()),
                )
                .await?;

            if output.format() != OutputFormat::Human {
                return output.data(&json!({ "match": finalized, "ratings": ratings }));
            }

            output.section("Rating changes")?;
            output.table(
                &["PLAYER", "BEFORE", "AFTER", "DELTA"],
                ratings
                    .changes
                    .iter()
                    .map(|c| {
                        vec![
                            c.player_id.clone(),
                            format!("{:.0}", c.before),
                            format!("{:.0}", c.after),
                            format!("{:+.1}", c.delta),
                        ]
                    })
                    .collect(),
            )
        }
    }
}
