//! Group command handlers

use super::utils::Backend;
use crate::cli::{GroupsAction, GroupsArgs, OutputFormat};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use serde_json::json;

/// Handle the groups command
pub async fn handle_groups(args: GroupsArgs, backend: &Backend, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        GroupsAction::List => {
            let groups = backend
                .request(output, "Loading groups", backend.api.groups.list(backend.cancel_token()))
                .await?;
            output.groups(&groups)
        }
        GroupsAction::Create { name, description } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::invalid_args("group name must not be blank"));
            }

            let group = backend
                .request(
                    output,
                    "Creating group",
                    backend
                        .api
                        .groups
                        .create(name, description.as_deref(), backend.cancel_token()),
                )
                .await?;

            if output.format() == OutputFormat::Human {
                output.success(&format!("✓ Created group {} ({})", group.name, group.id))
            } else {
                output.data(&group)
            }
        }
        GroupsAction::Join { id } => {
            backend
                .request(output, "Joining group", backend.api.groups.join(&id, backend.cancel_token()))
                .await?;

            if output.format() == OutputFormat::Human {
                output.success(&format!("✓ Joined group {}", id))
            } else {
                output.data(&json!({ "group": id, "joined": true }))
            }
        }
    }
}
