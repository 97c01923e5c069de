use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("Malformed card name '{name}': {reason}")]
    MalformedIdentity { name: String, reason: String },

    #[error("Card {0} must contain the <card_bottom_flag> line exactly once")]
    MissingSentinel(PathBuf),

    #[error("A card with topic '{0}' already exists")]
    DuplicateTopic(String),

    #[error("Invalid topic '{0}': only ASCII letters and digits are allowed")]
    InvalidTopicCharacters(String),

    #[error("Cannot reschedule: {0} already exists")]
    RenameConflict(PathBuf),

    #[error("Card not found: {0}")]
    NotFound(PathBuf),

    #[error("Editor '{editor}' failed: {status}")]
    EditorFailed { editor: String, status: String },
}

impl AppError {
    /// Failures caused by the cards directory changing underneath a session.
    /// The card keeps its previous name and stays due.
    pub fn is_commit_race(&self) -> bool {
        matches!(self, AppError::RenameConflict(_) | AppError::NotFound(_))
    }

    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        AppError::MalformedIdentity {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
