//! Default paths for focusroom components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/focusroom/config.toml` or `~/.config/focusroom/config.toml`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const FOCUSROOM_CONFIG_ENV: &str = "FOCUSROOM_CONFIG";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "focusroom";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$FOCUSROOM_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/focusroom/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/focusroom/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(FOCUSROOM_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking the FOCUSROOM_CONFIG env var.
/// Used for clap defaults where the env var is checked separately.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_contains_focusroom() {
        let path = config_path_without_env();
        assert!(path.to_string_lossy().contains("focusroom"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
