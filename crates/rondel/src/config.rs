use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Which screen edge the winner pointer sits on. This only shifts how the
/// wheel is drawn and hit-tested; the engine's angle math never sees it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PointerPosition {
    #[default]
    #[strum(serialize = "North", serialize = "n", serialize = "top")]
    North,
    #[strum(serialize = "East", serialize = "e", serialize = "right")]
    East,
    #[strum(serialize = "South", serialize = "s", serialize = "bottom")]
    South,
    #[strum(serialize = "West", serialize = "w", serialize = "left")]
    West,
}

impl PointerPosition {
    /// Drawing-space angle of the pointer's resting direction.
    pub fn angle(self) -> f64 {
        match self {
            Self::North => -PI / 2.0,
            Self::East => 0.0,
            Self::South => PI / 2.0,
            Self::West => PI,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Fading rim-dot trails while the wheel spins.
    pub motion_blur: bool,
    /// Audible click as the rim passes each detent.
    pub detent_clicks: bool,
    /// Screen edge the winner pointer sits on.
    pub pointer: PointerPosition,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            motion_blur: true,
            detent_clicks: false,
            pointer: PointerPosition::North,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "rondel", "rondel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("RONDEL"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Startup path: materialize the commented default file on a first run so
/// users have something to edit, then load whatever is there, falling back
/// to defaults on any error.
pub fn load_or_default() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
        && let Err(e) = write_default_config()
    {
        log::warn!("Failed to write the default config: {}", e);
    }

    match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Falling back to the default config: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_deserialization() {
        let cases = vec![
            ("\"north\"", PointerPosition::North),
            ("\"North\"", PointerPosition::North),
            ("\"NORTH\"", PointerPosition::North),
            ("\"n\"", PointerPosition::North),
            ("\"top\"", PointerPosition::North),
            ("\"e\"", PointerPosition::East),
            ("\"right\"", PointerPosition::East),
            ("\"s\"", PointerPosition::South),
            ("\"left\"", PointerPosition::West),
        ];

        for (json, expected) in cases {
            let deserialized: PointerPosition = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_default_config_file_matches_defaults() {
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_fills_missing_fields() {
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from_str(
                "pointer = \"west\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(parsed.pointer, PointerPosition::West);
        assert!(parsed.motion_blur);
        assert!(!parsed.detent_clicks);
    }
}
