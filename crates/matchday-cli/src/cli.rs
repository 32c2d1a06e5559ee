//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Matchday CLI - organise pick-up football from the terminal
///
/// Sign in, manage your players and groups, schedule matches and generate
/// balanced teams against a Matchday backend.
#[derive(Parser, Debug)]
#[command(
    name = "matchday",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "MATCHDAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session token
    Login(CredentialArgs),

    /// Forget the stored session
    Logout,

    /// Create an account
    Register(CredentialArgs),

    /// Request a password reset email
    Forgot(ForgotArgs),

    /// Show the current session and backend
    Whoami,

    /// Manage players
    Players(PlayersArgs),

    /// Manage groups
    Groups(GroupsArgs),

    /// Schedule and settle matches
    Matches(MatchesArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Email and password for credential flows
#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "MATCHDAY_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct ForgotArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,
}

#[derive(Args, Debug)]
pub struct PlayersArgs {
    #[command(subcommand)]
    pub action: PlayersAction,
}

#[derive(Subcommand, Debug)]
pub enum PlayersAction {
    /// List players
    List {
        /// Every player visible to you, not only your own
        #[arg(long, conflicts_with = "space")]
        all: bool,

        /// Players of a group, with their group rating
        #[arg(long, value_name = "GROUP_ID")]
        space: Option<String>,
    },

    /// Show one player
    Get {
        /// Player id
        id: String,
    },

    /// Set ability scores, e.g. `running=7 passes=5`
    Skills {
        /// Player id
        id: String,

        /// Ability scores as KEY=VALUE
        #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_ability)]
        abilities: Vec<(String, f64)>,
    },
}

#[derive(Args, Debug)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub action: GroupsAction,
}

#[derive(Subcommand, Debug)]
pub enum GroupsAction {
    /// List your groups
    List,

    /// Create a group
    Create {
        /// Group name
        name: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Join a group
    Join {
        /// Group id
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct MatchesArgs {
    #[command(subcommand)]
    pub action: MatchesAction,
}

#[derive(Subcommand, Debug)]
pub enum MatchesAction {
    /// List matches of a group
    List {
        /// Group id
        group: String,
    },

    /// Schedule a match
    Create {
        /// Group id
        group: String,

        /// Participating player ids
        #[arg(short, long = "player", value_name = "PLAYER_ID", required = true, value_delimiter = ',')]
        players: Vec<String>,

        /// Kick-off time (RFC 3339)
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<DateTime<Utc>>,
    },

    /// Generate teams for a match
    Teams {
        /// Match id
        id: String,

        /// Let the backend balance teams with its AI strategy
        #[arg(long)]
        ai: bool,

        /// Seed for reproducible splits
        #[arg(long)]
        seed: Option<i64>,
    },

    /// Record the final score and apply rating changes
    Finalize {
        /// Match id
        id: String,

        /// Goals for team A
        score_a: u32,

        /// Goals for team B
        score_b: u32,

        /// Skip applying rating changes
        #[arg(long)]
        no_ratings: bool,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Show configuration in specified format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Commands {
    /// Screen the command stands for, as seen by the session guard
    pub fn location(&self) -> &'static str {
        match self {
            Commands::Login(_) => "/login",
            Commands::Register(_) => "/register",
            Commands::Forgot(_) => "/forgot",
            Commands::Players(_) => "/players",
            Commands::Groups(_) => "/groups",
            Commands::Matches(_) => "/matches",
            Commands::Logout | Commands::Whoami | Commands::Config(_) | Commands::Completions(_) => "/",
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

fn parse_ability(raw: &str) -> std::result::Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing ability name in '{}'", raw));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid score for '{}': {}", key, e))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("score for '{}' must be a non-negative number, got {}", key, value));
    }
    Ok((key.to_string(), value))
}

fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["matchday", "-vv", "whoami"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["matchday", "--quiet", "whoami"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_skills_parsing() {
        let cli = Cli::parse_from(["matchday", "players", "skills", "p2", "running=5", "passes = 7"]);
        match cli.command {
            Commands::Players(PlayersArgs {
                action: PlayersAction::Skills { id, abilities },
            }) => {
                assert_eq!(id, "p2");
                assert_eq!(abilities, vec![("running".to_string(), 5.0), ("passes".to_string(), 7.0)]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["matchday", "players", "skills", "p2", "running"]).is_err());
        assert!(Cli::try_parse_from(["matchday", "players", "skills", "p2", "running=-1"]).is_err());
        assert!(Cli::try_parse_from(["matchday", "players", "skills", "p2", "running=NaN"]).is_err());
        assert!(Cli::try_parse_from(["matchday", "players", "skills", "p2", "running=7.5"]).is_ok());
    }

    #[test]
    fn test_match_create_parsing() {
        let cli = Cli::parse_from([
            "matchday", "matches", "create", "g1", "-p", "p1,p2", "--player", "p3", "--at", "2024-01-01T10:00:00Z",
        ]);
        match cli.command {
            Commands::Matches(MatchesArgs {
                action: MatchesAction::Create { group, players, at },
            }) => {
                assert_eq!(group, "g1");
                assert_eq!(players, vec!["p1", "p2", "p3"]);
                assert_eq!(at.unwrap().to_rfc3339(), "2024-01-01T10:00:00+00:00");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_command_locations() {
        let cli = Cli::parse_from(["matchday", "login", "-e", "a@b.com", "-p", "x"]);
        assert_eq!(cli.command.location(), "/login");

        let cli = Cli::parse_from(["matchday", "groups", "list"]);
        assert_eq!(cli.command.location(), "/groups");

        let cli = Cli::parse_from(["matchday", "completions", "bash"]);
        assert_eq!(cli.command.location(), "/");
    }
}
