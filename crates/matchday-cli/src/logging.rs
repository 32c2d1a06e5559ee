//! Logging utilities for the Matchday CLI
//!
//! This module provides:
//! - Structured logging setup with console or JSON output
//! - A per-process request ID
//! - Sensitive data redaction
//! - Performance timing spans

use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "MATCHDAY_LOG_FORMAT";

/// Global request ID for the current process
static REQUEST_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Enable ANSI colours on the console
    pub console: bool,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact format for everyday use
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "full" => Some(LogFormat::Full),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {
                config.level = "warn".to_string();
            }
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply environment overrides; RUST_LOG wins over verbosity
    pub fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rust_log) = lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            self.level = rust_log;
        }

        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            match LogFormat::parse(&format) {
                Some(parsed) => self.format = parsed,
                None => tracing::warn!("Invalid log format: {}, using default", format),
            }
        }
    }
}

/// Initialize the global logging system
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::other(format!("Invalid log filter '{}': {}", config.level, e)))?;
    let ansi = config.console && std::io::stderr().is_terminal();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(config.thread_ids)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Compact => tracing::subscriber::set_global_default(builder.with_ansi(ansi).compact().finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish()),
        LogFormat::Full => tracing::subscriber::set_global_default(builder.with_ansi(ansi).finish()),
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let request_id = REQUEST_ID.get_or_init(generate_request_id);
    tracing::debug!(request_id = %request_id, config = ?config, "Logging system initialized");

    Ok(())
}

/// Generate a unique request ID for this process
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// Get the current request ID, creating it on first use
pub fn request_id() -> &'static str {
    REQUEST_ID.get_or_init(generate_request_id).as_str()
}

/// Root span every command runs in
pub fn root_span(command: &str) -> Span {
    tracing::info_span!("matchday", command = command, request_id = request_id())
}

/// Create a span with request ID and timing
pub fn create_operation_span(operation: &str) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        request_id = request_id(),
        duration_ms = field::Empty,
    )
}

/// Sensitive data redaction utilities
pub mod redaction {
    use regex::Regex;
    use std::sync::OnceLock;

    fn bearer_pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9_.~+/=-]+").expect("Valid regex pattern"))
    }

    fn token_pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| {
            Regex::new(r#"(?i)(token)["']?\s*[=:]\s*["']?([A-Za-z0-9_.-]{6,})["']?"#).expect("Valid regex pattern")
        })
    }

    fn password_pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| {
            Regex::new(r#"(?i)(password|passwd|pwd)["']?\s*[=:]\s*["']?([^\s'",}]{1,})["']?"#)
                .expect("Valid regex pattern")
        })
    }

    /// Redact sensitive information from a string
    pub fn redact_sensitive(input: &str) -> String {
        let result = bearer_pattern().replace_all(input, "Bearer ***");
        let result = token_pattern().replace_all(&result, "$1=***");
        password_pattern().replace_all(&result, "$1=***").into_owned()
    }

    /// Redact sensitive information from JSON values
    pub fn redact_json_value(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *val = serde_json::Value::String("***".to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            serde_json::Value::Array(arr) => {
                for item in arr.iter_mut() {
                    redact_json_value(item);
                }
            }
            serde_json::Value::String(s) => {
                *s = redact_sensitive(s);
            }
            _ => {}
        }
    }

    /// Check if a JSON key holds a credential
    fn is_sensitive_key(key: &str) -> bool {
        let key_lower = key.to_lowercase();
        key_lower.contains("token")
            || key_lower.contains("password")
            || key_lower.contains("passwd")
            || key_lower.contains("secret")
            || key_lower == "authorization"
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// A timer that logs its duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation),
                operation: operation.to_string(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let input = "Authorization: Bearer abc.123.token password=secret123 token: xyz987654";
        let redacted = redaction::redact_sensitive(input);
        assert!(redacted.contains("Bearer ***"));
        assert!(redacted.contains("password=***"));
        assert!(redacted.contains("token=***"));
        assert!(!redacted.contains("abc.123.token"));
        assert!(!redacted.contains("secret123"));
        assert!(!redacted.contains("xyz987654"));
    }

    #[test]
    fn test_json_redaction() {
        let mut value = serde_json::json!({
            "email": "a@b.com",
            "password": "x",
            "session": {"token": "abc.123.token"},
            "note": "sent Bearer abc.123.token"
        });

        redaction::redact_json_value(&mut value);

        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["password"], "***");
        assert_eq!(value["session"]["token"], "***");
        assert_eq!(value["note"], "sent Bearer ***");
    }

    #[test]
    fn test_logging_config_from_verbosity() {
        let config = LoggingConfig::from_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = LoggingConfig::from_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = LoggingConfig::from_verbosity(3);
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.thread_ids);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = LoggingConfig::from_verbosity(1);
        config.merge_with(|key| match key {
            "RUST_LOG" => Some("matchday_core=trace".to_string()),
            LOG_FORMAT_ENV => Some("JSON".to_string()),
            _ => None,
        });
        assert_eq!(config.level, "matchday_core=trace");
        assert_eq!(config.format, LogFormat::Json);

        let mut config = LoggingConfig::default();
        config.merge_with(|key| (key == LOG_FORMAT_ENV).then(|| "fancy".to_string()));
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_request_id_is_stable() {
        let first = request_id();
        assert!(first.starts_with("req_"));
        assert_eq!(first, request_id());
    }
}
