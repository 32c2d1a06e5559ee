//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show { format } => handle_config_show(format, config, output),
    }
}

/// Handle config show subcommand
fn handle_config_show(format: ConfigFormat, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let rendered = render(config, format)?;
    output.write(&rendered)?;
    if !rendered.ends_with('\n') {
        output.writeln("")?;
    }
    Ok(())
}

fn render(config: &Config, format: ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_round_trips_through_yaml() {
        let mut config = Config::default();
        config.api.origin = Some("http://localhost:5173".to_string());

        let rendered = render(&config, ConfigFormat::Yaml).unwrap();
        assert!(rendered.contains("http://localhost:3000/api"));

        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_render_json() {
        let rendered = render(&Config::default(), ConfigFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["api"]["match_not_found_message"], false);
        assert_eq!(value["logging"]["format"], "compact");
    }
}
