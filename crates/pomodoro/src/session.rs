//! Session records
//!
//! A session is one timer interval (work, short break or long break) that
//! either ran to zero or was interrupted. Records are immutable once they
//! reach the session log.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of timer interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// A pomodoro: focused work
    Work,
    /// Short rest between pomodoros
    ShortBreak,
    /// Longer rest after a full cycle
    LongBreak,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Work => "work",
            SessionKind::ShortBreak => "short_break",
            SessionKind::LongBreak => "long_break",
        }
    }

    /// Human-readable label for menus and notifications
    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Work => "Pomodoro",
            SessionKind::ShortBreak => "Short break",
            SessionKind::LongBreak => "Long break",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished timer interval as stored in the session log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Task worked on, if any. May point at a task deleted since.
    #[serde(default)]
    pub task_id: Option<u64>,
    pub kind: SessionKind,
    /// Planned minutes when completed, whole elapsed minutes when interrupted
    pub duration_minutes: u32,
    pub completed_at: DateTime<Local>,
    #[serde(default)]
    pub was_interrupted: bool,
}

impl Session {
    pub fn completed(
        kind: SessionKind,
        duration_minutes: u32,
        task_id: Option<u64>,
        completed_at: DateTime<Local>,
    ) -> Self {
        Self {
            task_id,
            kind,
            duration_minutes,
            completed_at,
            was_interrupted: false,
        }
    }

    pub fn interrupted(
        kind: SessionKind,
        elapsed_minutes: u32,
        task_id: Option<u64>,
        stopped_at: DateTime<Local>,
    ) -> Self {
        Self {
            task_id,
            kind,
            duration_minutes: elapsed_minutes,
            completed_at: stopped_at,
            was_interrupted: true,
        }
    }

    /// Completed work: the only sessions productivity figures count
    pub fn is_productive(&self) -> bool {
        self.kind == SessionKind::Work && !self.was_interrupted
    }

    /// Local calendar date of completion
    pub fn date(&self) -> NaiveDate {
        self.completed_at.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SessionKind::ShortBreak).unwrap();
        assert_eq!(json, "\"short_break\"");
        let kind: SessionKind = serde_json::from_str("\"long_break\"").unwrap();
        assert_eq!(kind, SessionKind::LongBreak);
    }

    #[test]
    fn test_productive_sessions() {
        let at = Local.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        assert!(Session::completed(SessionKind::Work, 25, None, at).is_productive());
        assert!(!Session::interrupted(SessionKind::Work, 12, None, at).is_productive());
        assert!(!Session::completed(SessionKind::ShortBreak, 5, None, at).is_productive());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"kind":"work","duration_minutes":25,"completed_at":"2024-03-04T10:00:00+00:00"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.task_id, None);
        assert!(!session.was_interrupted);
    }
}
