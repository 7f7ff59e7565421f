//! Error taxonomy shared by the stores, the timer and the settings

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pomodoro-specific errors
#[derive(Error, Debug)]
pub enum PomodoroError {
    #[error("Task #{0} not found")]
    NotFound(u64),

    #[error("{0}")]
    InvalidState(String),

    #[error("Could not access {}: {}", .path.display(), .reason)]
    Persistence { path: PathBuf, reason: String },
}

impl PomodoroError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn persistence(path: &Path, reason: impl ToString) -> Self {
        Self::Persistence {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Persistence failures are warnings; the others go back to the menu
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

pub type Result<T> = std::result::Result<T, PomodoroError>;
