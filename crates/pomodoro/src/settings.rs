//! Timer settings
//!
//! Loaded once at startup and written back immediately whenever the
//! settings menu changes a value.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{PomodoroError, Result};
use crate::session::SessionKind;
use crate::store::{ensure_parent, read_json, write_json};

/// Longest interval any timer may be set to
pub const MAX_MINUTES: u32 = 480;
/// Most pomodoros allowed before a long break
pub const MAX_INTERVAL: u32 = 12;

/// User-adjustable timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_pomodoro_minutes")]
    pub pomodoro_minutes: u32,

    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,

    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,

    /// Completed pomodoros before the suggested break is a long one
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,

    /// Desktop notification when a timer runs out
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_pomodoro_minutes() -> u32 {
    25
}

fn default_short_break_minutes() -> u32 {
    5
}

fn default_long_break_minutes() -> u32 {
    15
}

fn default_long_break_interval() -> u32 {
    4
}

fn default_notifications() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_minutes: default_pomodoro_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
            notifications: default_notifications(),
        }
    }
}

/// The numeric settings the menu can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    PomodoroMinutes,
    ShortBreakMinutes,
    LongBreakMinutes,
    LongBreakInterval,
}

impl SettingField {
    pub fn label(&self) -> &'static str {
        match self {
            SettingField::PomodoroMinutes => "Pomodoro duration (minutes)",
            SettingField::ShortBreakMinutes => "Short break duration (minutes)",
            SettingField::LongBreakMinutes => "Long break duration (minutes)",
            SettingField::LongBreakInterval => "Pomodoros before a long break",
        }
    }

    fn max(&self) -> u32 {
        match self {
            SettingField::LongBreakInterval => MAX_INTERVAL,
            _ => MAX_MINUTES,
        }
    }
}

impl Settings {
    /// Planned minutes for a timer of this kind
    pub fn duration_for(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.pomodoro_minutes,
            SessionKind::ShortBreak => self.short_break_minutes,
            SessionKind::LongBreak => self.long_break_minutes,
        }
    }

    pub fn get(&self, field: SettingField) -> u32 {
        match field {
            SettingField::PomodoroMinutes => self.pomodoro_minutes,
            SettingField::ShortBreakMinutes => self.short_break_minutes,
            SettingField::LongBreakMinutes => self.long_break_minutes,
            SettingField::LongBreakInterval => self.long_break_interval,
        }
    }

    fn slot(&mut self, field: SettingField) -> &mut u32 {
        match field {
            SettingField::PomodoroMinutes => &mut self.pomodoro_minutes,
            SettingField::ShortBreakMinutes => &mut self.short_break_minutes,
            SettingField::LongBreakMinutes => &mut self.long_break_minutes,
            SettingField::LongBreakInterval => &mut self.long_break_interval,
        }
    }

    fn check(field: SettingField, value: u32) -> Result<()> {
        if value == 0 || value > field.max() {
            return Err(PomodoroError::invalid(format!(
                "{} must be between 1 and {}, got {}",
                field.label(),
                field.max(),
                value
            )));
        }
        Ok(())
    }

    /// Every duration and the interval must be positive and bounded
    pub fn validate(&self) -> Result<()> {
        for field in [
            SettingField::PomodoroMinutes,
            SettingField::ShortBreakMinutes,
            SettingField::LongBreakMinutes,
            SettingField::LongBreakInterval,
        ] {
            Self::check(field, self.get(field))?;
        }
        Ok(())
    }
}

/// Settings bound to their file
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
    recovered: Option<PomodoroError>,
}

impl SettingsStore {
    /// Load settings; unreadable or invalid files fall back to defaults
    pub fn open(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        let (settings, mut recovered) = read_json::<Settings>(path).recover();

        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid settings, using defaults");
                recovered = Some(PomodoroError::persistence(path, e));
                Settings::default()
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            settings,
            recovered,
        })
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Change one value. Invalid values leave the settings untouched.
    pub fn set(&mut self, field: SettingField, value: u32) -> Result<()> {
        Settings::check(field, value)?;
        *self.settings.slot(field) = value;
        info!(?field, value, "setting changed");
        self.save()
    }

    /// Flip desktop notifications, returning the new state
    pub fn toggle_notifications(&mut self) -> Result<bool> {
        self.settings.notifications = !self.settings.notifications;
        self.save()?;
        Ok(self.settings.notifications)
    }

    /// Restore every default
    pub fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();
        info!("settings reset to defaults");
        self.save()
    }

    fn save(&self) -> Result<()> {
        write_json(&self.path, &self.settings)
    }

    /// The load error recovered from in `open`, handed out once
    pub fn take_recovery_warning(&mut self) -> Option<PomodoroError> {
        self.recovered.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.duration_for(SessionKind::Work), 25);
        assert_eq!(settings.duration_for(SessionKind::ShortBreak), 5);
        assert_eq!(settings.duration_for(SessionKind::LongBreak), 15);
        assert_eq!(settings.long_break_interval, 4);
        assert!(settings.notifications);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"pomodoro_minutes": 50}"#).unwrap();
        assert_eq!(settings.pomodoro_minutes, 50);
        assert_eq!(settings.short_break_minutes, 5);
        assert_eq!(settings.long_break_interval, 4);
    }

    #[test]
    fn test_set_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::open(&path).unwrap();
        store.set(SettingField::PomodoroMinutes, 50).unwrap();
        store.set(SettingField::LongBreakInterval, 3).unwrap();

        let reloaded = SettingsStore::open(&path).unwrap();
        assert_eq!(reloaded.get().pomodoro_minutes, 50);
        assert_eq!(reloaded.get().long_break_interval, 3);
    }

    #[test]
    fn test_non_positive_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SettingsStore::open(&dir.path().join("settings.json")).unwrap();

        let err = store.set(SettingField::ShortBreakMinutes, 0).unwrap_err();
        assert!(matches!(err, PomodoroError::InvalidState(_)));
        assert!(matches!(
            store.set(SettingField::LongBreakInterval, MAX_INTERVAL + 1),
            Err(PomodoroError::InvalidState(_))
        ));
        assert_eq!(store.get(), &Settings::default());
    }

    #[test]
    fn test_reset_and_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut store = SettingsStore::open(&path).unwrap();

        store.set(SettingField::LongBreakMinutes, 30).unwrap();
        assert!(!store.toggle_notifications().unwrap());
        store.reset().unwrap();

        let reloaded = SettingsStore::open(&path).unwrap();
        assert_eq!(reloaded.get(), &Settings::default());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"pomodoro_minutes": 0}"#).unwrap();

        let mut store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.get(), &Settings::default());
        assert!(store.take_recovery_warning().is_some());
    }
}
