use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_cards_dir")]
    pub cards_dir: String,

    /// Command used to edit cards. Falls back to $VISUAL, $EDITOR, then vi.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    #[serde(default = "default_rule_width")]
    pub rule_width: usize,
}

fn default_cards_dir() -> String {
    if let Some(home) = dirs::home_dir() {
        home.join(".leitner/cards").to_string_lossy().to_string()
    } else {
        "./cards".to_string()
    }
}

fn default_rule_width() -> usize {
    80
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cards_dir: default_cards_dir(),
            editor: None,
            rule_width: default_rule_width(),
        }
    }
}

impl Config {
    /// Load the config file, writing out defaults when it does not exist yet.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    warn!("could not write default config to {}: {e}", path.display());
                }
                return Ok(config);
            }
            Err(e) => return Err(e.into()),
        };

        let mut config: Config = toml::from_str(&contents)?;
        config.cards_dir = expand_tilde(&config.cards_dir);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("leitner");
        path.push("config.toml");
        path
    }

    pub fn cards_path(&self) -> PathBuf {
        PathBuf::from(&self.cards_dir)
    }

    /// Editor command split into program and arguments.
    pub fn editor_command(&self) -> Vec<String> {
        let configured = self
            .editor
            .clone()
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "vi".to_string());
        configured.split_whitespace().map(str::to_string).collect()
    }
}

fn expand_tilde(dir: &str) -> String {
    if let Some(rest) = dir.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.to_string_lossy());
        }
    }
    dir.to_string()
}
