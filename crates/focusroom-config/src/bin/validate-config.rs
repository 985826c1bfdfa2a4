//! Config validation CLI tool
//!
//! Validates a focusroom configuration file and reports any errors.

use focusroom_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a focusroom configuration file.");
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match focusroom_config::load_config(&config_path) {
        Ok(config) => {
            let settings = config.settings;
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", focusroom_config::CURRENT_CONFIG_VERSION);
            println!(
                "  Focus mode: {} ({})",
                config.focus_mode.display_name(),
                config.focus_mode
            );
            println!("  Work: {} min", settings.work_duration);
            println!("  Short break: {} min", settings.short_break);
            println!("  Long break: {} min", settings.long_break);
            println!(
                "  Long break every {} work session(s)",
                settings.sessions_until_long_break
            );
            println!("  Daily goal: {} session(s)", config.daily_goal);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                focusroom_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                focusroom_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                focusroom_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                focusroom_config::ConfigError::InvalidSettings(err) => {
                    eprintln!("Invalid settings: {}", err);
                }
                focusroom_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        focusroom_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
