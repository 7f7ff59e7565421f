//! Standard paths used by the pomodoro tools

use std::path::{Path, PathBuf};

const APP_DIR: &str = "pomodoro";

/// Standard pomodoro paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Data directory (~/.local/share/pomodoro)
    pub data: PathBuf,
    /// Config directory (~/.config/pomodoro)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join(APP_DIR);

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR);

        Self { data, config }
    }

    /// Keep every file in one directory (used by `--data-dir`)
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            data: dir.to_path_buf(),
            config: dir.to_path_buf(),
        }
    }

    /// Task list file
    pub fn tasks(&self) -> PathBuf {
        self.data.join("tasks.json")
    }

    /// Completed session history
    pub fn sessions(&self) -> PathBuf {
        self.data.join("sessions.json")
    }

    /// Timer durations and preferences
    pub fn settings(&self) -> PathBuf {
        self.config.join("settings.json")
    }

    /// Destination for an export file
    pub fn export(&self, file_name: &str) -> PathBuf {
        self.data.join(file_name)
    }
}
