//! Matchday CLI - command-line client for the Matchday backend
//!
//! This is the main entry point for the Matchday CLI application, providing
//! commands to sign in, manage players and groups, and schedule and settle
//! matches.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod navigator;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::{Config, LoggingSection};
use error::Result;
use handlers::Backend;
use logging::{timing::Timer, LogFormat, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::Instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    let config = Config::load_with_file(cli.config.as_deref());

    if let Err(e) = init_logging(&cli, config.as_ref().ok().map(|c| &c.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let span = logging::root_span(cli.command.location());
    let result = match config {
        Ok(config) => run(cli, config).instrument(span).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet);

    tracing::info!(
        location = cli.command.location(),
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
        command => {
            let backend = Backend::connect(&config, command.location())?;
            match command {
                Commands::Login(args) => handlers::handle_login(args, &backend, &mut output).await,
                Commands::Register(args) => handlers::handle_register(args, &backend, &mut output).await,
                Commands::Forgot(args) => handlers::handle_forgot(args, &backend, &mut output).await,
                Commands::Logout => handlers::handle_logout(&backend, &mut output),
                Commands::Whoami => handlers::handle_whoami(&backend, &config, &mut output),
                Commands::Players(args) => handlers::handle_players(args, &backend, &mut output).await,
                Commands::Groups(args) => handlers::handle_groups(args, &backend, &mut output).await,
                Commands::Matches(args) => handlers::handle_matches(args, &backend, &mut output).await,
                Commands::Config(_) | Commands::Completions(_) => Ok(()),
            }
        }
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, settings: Option<&LoggingSection>) -> Result<()> {
    let logging_config = logging_config(cli, settings, |key| std::env::var(key).ok());
    logging::init_logging(logging_config)
}

/// Verbosity flags, then the config file, then the environment
fn logging_config<F>(cli: &Cli, settings: Option<&LoggingSection>, lookup: F) -> LoggingConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    if let Some(settings) = settings {
        if cli.verbosity_level() == 0 {
            if let Some(level) = &settings.level {
                logging_config.level = level.clone();
            }
        }
        if let Some(format) = LogFormat::parse(&settings.format) {
            logging_config.format = format;
        }
    }

    logging_config.merge_with(lookup);

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging_config
}
