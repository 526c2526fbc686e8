use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKPAD_CONFIG_PATH";

/// ANSI styling for human-readable output. Empty codes mean plain text.
#[derive(Debug, Clone)]
pub struct Palette {
    pub pending: &'static str,
    pub done: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn paint_pending(&self, text: &str) -> String {
        self.paint(self.pending, text)
    }

    pub fn paint_done(&self, text: &str) -> String {
        self.paint(self.done, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if code.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", code, text, self.reset)
        }
    }
}

/// Maps a raw theme name onto one of the known themes: `plain` (no color),
/// `ember`, `moss`. Unknown names pass through and later resolve to `plain`.
pub fn normalize_theme_name(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "" | "none" | "default" | "light" => "plain".to_string(),
        "dark" => "ember".to_string(),
        other => other.to_string(),
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    let name = theme.map(normalize_theme_name).unwrap_or_default();
    match name.as_str() {
        "ember" => Palette {
            pending: "\x1b[38;5;214m",
            done: "\x1b[38;5;245m",
            reset: "\x1b[0m",
        },
        "moss" => Palette {
            pending: "\x1b[38;5;114m",
            done: "\x1b[38;5;245m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            pending: "",
            done: "",
            reset: "",
        },
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    /// Interactive-session shortcuts: first token of a line is replaced by
    /// the alias value before parsing.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskpad").join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskpad")
            .join(CONFIG_FILE_NAME))
    }
}

/// Loads the config, falling back to defaults on any failure so a broken
/// config file never blocks the CLI. The error, if any, rides along for the
/// caller to surface.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.map(|name| normalize_theme_name(&name));
    Ok(config)
}
