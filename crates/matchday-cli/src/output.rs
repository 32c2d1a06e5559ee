//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with dedicated human
//! renderings for players, groups, matches and generated teams.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use matchday_core::types::{Group, Match, MatchStatus, Player, Team};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for domain types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a player listing
    fn format_players(&self, players: &[Player]) -> Result<String>;

    /// Format a group listing
    fn format_groups(&self, groups: &[Group]) -> Result<String>;

    /// Format a match listing
    fn format_matches(&self, matches: &[Match]) -> Result<String>;

    /// Format generated teams
    fn format_teams(&self, teams: &[Team]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // No dedicated rendering, pretty JSON reads well enough
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_players(&self, players: &[Player]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_players_human(players)),
            _ => self.format(&players),
        }
    }

    fn format_groups(&self, groups: &[Group]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_groups_human(groups)),
            _ => self.format(&groups),
        }
    }

    fn format_matches(&self, matches: &[Match]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_matches_human(matches)),
            _ => self.format(&matches),
        }
    }

    fn format_teams(&self, teams: &[Team]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_teams_human(teams)),
            _ => self.format(&teams),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress_enabled(quiet),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!(data = %value_json, "Outputting data");

        let formatted = self.format.format(value)?;
        self.emit(&formatted)
    }

    pub fn players(&mut self, players: &[Player]) -> Result<()> {
        let formatted = self.format.format_players(players)?;
        self.emit(&formatted)
    }

    pub fn groups(&mut self, groups: &[Group]) -> Result<()> {
        let formatted = self.format.format_groups(groups)?;
        self.emit(&formatted)
    }

    pub fn matches(&mut self, matches: &[Match]) -> Result<()> {
        let formatted = self.format.format_matches(matches)?;
        self.emit(&formatted)
    }

    pub fn teams(&mut self, teams: &[Team]) -> Result<()> {
        let formatted = self.format.format_teams(teams)?;
        self.emit(&formatted)
    }

    /// Create a spinner for indeterminate progress
    ///
    /// The spinner draws on stderr so it never mixes with formatted data.
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        let rendered = render_table(headers, &rows);
        let mut lines = rendered.lines();
        if let Some(header_row) = lines.next() {
            if self.use_color {
                self.writeln(&header_row.bold().to_string())?;
            } else {
                self.writeln(header_row)?;
            }
        }
        for line in lines {
            self.writeln(line)?;
        }

        Ok(())
    }

    fn emit(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

/// Spinners only draw on an interactive stderr and never in quiet mode
fn progress_enabled(quiet: bool) -> bool {
    !quiet && io::stderr().is_terminal()
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let pad = |cell: &str, width: usize| format!("{:width$}", cell, width = width);

    let mut out = String::new();
    let header_row = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect::<Vec<_>>()
        .join(" │ ");
    out.push_str(header_row.trim_end());
    out.push('\n');

    let separator = widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─");
    out.push_str(&separator);
    out.push('\n');

    for row in rows {
        let row_str = row
            .iter()
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(width) => pad(cell, *width),
                None => cell.clone(),
            })
            .collect::<Vec<_>>()
            .join(" │ ");
        out.push_str(row_str.trim_end());
        out.push('\n');
    }

    out
}

fn format_players_human(players: &[Player]) -> String {
    if players.is_empty() {
        return "No players.\n".to_string();
    }

    let rows = players
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                p.nickname.clone().unwrap_or_default(),
                p.effective_rating().map(|r| format!("{:.0}", r)).unwrap_or_else(|| "-".to_string()),
                p.games_played.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect::<Vec<_>>();

    render_table(&["ID", "NAME", "NICKNAME", "RATING", "GAMES"], &rows)
}

fn format_groups_human(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups.\n".to_string();
    }

    let rows = groups
        .iter()
        .map(|g| {
            let role = if g.is_owner {
                "owner"
            } else if g.is_member {
                "member"
            } else {
                ""
            };
            vec![
                g.id.clone(),
                g.name.clone(),
                g.players.len().to_string(),
                role.to_string(),
                g.description.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();

    render_table(&["ID", "NAME", "PLAYERS", "ROLE", "DESCRIPTION"], &rows)
}

fn format_matches_human(matches: &[Match]) -> String {
    if matches.is_empty() {
        return "No matches.\n".to_string();
    }

    let rows = matches
        .iter()
        .map(|m| {
            vec![
                m.id.clone(),
                m.scheduled_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                status_label(m.status).to_string(),
                m.participants.len().to_string(),
                m.result
                    .as_ref()
                    .map(|r| format!("{} - {}", r.score_a, r.score_b))
                    .unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();

    render_table(&["ID", "SCHEDULED", "STATUS", "PLAYERS", "SCORE"], &rows)
}

fn format_teams_human(teams: &[Team]) -> String {
    if teams.is_empty() {
        return "No teams generated.\n".to_string();
    }

    let mut out = String::new();
    for team in teams {
        out.push_str(&format!("{} (score {:.1})\n", team.name, team.score));
        for player in &team.players {
            out.push_str(&format!("  - {}\n", player));
        }
    }
    out
}

fn status_label(status: Option<MatchStatus>) -> &'static str {
    match status {
        Some(MatchStatus::Pending) => "pending",
        Some(MatchStatus::Draft) => "draft",
        Some(MatchStatus::InProgress) => "in progress",
        Some(MatchStatus::Finished) => "finished",
        Some(MatchStatus::Finalized) => "finalized",
        Some(MatchStatus::Unknown) | None => "-",
    }
}
