//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod auth;
mod completions;
mod config;
mod groups;
mod matches;
mod players;
mod utils;

pub use auth::{handle_forgot, handle_login, handle_logout, handle_register, handle_whoami};
pub use completions::handle_completions;
pub use config::handle_config;
pub use groups::handle_groups;
pub use matches::handle_matches;
pub use players::handle_players;
pub use utils::Backend;
