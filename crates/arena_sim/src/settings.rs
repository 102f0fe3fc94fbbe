//! TOML configuration loading.
//!
//! Lookup order: an explicit `--config` path, then `~/.arena/config.toml`,
//! then built-in defaults. A missing default file is not an error; a missing
//! explicit file is.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arena_core::ArenaConfig;
use tracing::{debug, info};

const DATA_DIR: &str = ".arena";
const CONFIG_FILE: &str = "config.toml";

/// `~/.arena/config.toml`, or `None` when there is no home directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|mut path| {
        path.push(DATA_DIR);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn parse_config(content: &str) -> Result<ArenaConfig> {
    let config: ArenaConfig = toml::from_str(content).context("parsing TOML config")?;
    config.validate().context("validating config")?;
    Ok(config)
}

pub fn load_from_path(path: &Path) -> Result<ArenaConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("loading {}", path.display()))
}

pub fn load(explicit: Option<&Path>) -> Result<ArenaConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "loading config");
        return load_from_path(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "loading config");
            load_from_path(&path)
        }
        _ => {
            debug!("no config file found, using defaults");
            Ok(ArenaConfig::default())
        }
    }
}

pub fn to_toml(config: &ArenaConfig) -> Result<String> {
    toml::to_string_pretty(config).context("serializing config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = parse_config(
            r#"
            [quality]
            window_capacity = 60
            target_frame_time_ms = 8.33

            [audio]
            event_band_hz = [300.0, 3000.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.quality.window_capacity, 60);
        assert_eq!(config.quality.target_frame_time_ms, 8.33);
        assert_eq!(config.quality.margin_tolerance_ms, 1.0);
        assert_eq!(config.audio.event_band_hz, (300.0, 3000.0));
        assert_eq!(config.vision, ArenaConfig::default().vision);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(parse_config("[quality]\nwindow_capacity = 0\n").is_err());
        assert!(parse_config("[quality]\nwindow_capacity = \"many\"\n").is_err());
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let config = ArenaConfig::default();
        let text = to_toml(&config).unwrap();
        assert!(text.contains("[quality]"));
        assert_eq!(parse_config(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("arena-sim-missing-config.toml");
        let err = load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("reading config file"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("arena-sim-config-{}.toml", std::process::id()));
        fs::write(&path, "[performance]\ntarget_fps = 144.0\n").unwrap();
        let config = load(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.performance.target_fps, 144.0);
    }
}
