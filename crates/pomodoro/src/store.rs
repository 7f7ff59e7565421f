//! JSON file persistence and the session log
//!
//! Every collection lives in one pretty-printed JSON file that is rewritten
//! whole on each mutation. A file that cannot be read or parsed at startup
//! is treated as absent; the failure is kept so the caller can warn about it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{PomodoroError, Result};
use crate::session::Session;

/// Outcome of reading a JSON file at startup
#[derive(Debug)]
pub enum Loaded<T> {
    Missing,
    Found(T),
    Corrupt(PomodoroError),
}

impl<T: Default> Loaded<T> {
    /// Value to start from plus the error that was recovered from, if any
    pub fn recover(self) -> (T, Option<PomodoroError>) {
        match self {
            Loaded::Missing => (T::default(), None),
            Loaded::Found(value) => (value, None),
            Loaded::Corrupt(err) => (T::default(), Some(err)),
        }
    }
}

/// Read and parse a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Loaded<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Loaded::Missing,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable file, starting empty");
            return Loaded::Corrupt(PomodoroError::persistence(path, e));
        }
    };

    if content.trim().is_empty() {
        return Loaded::Missing;
    }

    match serde_json::from_str(&content) {
        Ok(value) => Loaded::Found(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed JSON, starting empty");
            Loaded::Corrupt(PomodoroError::persistence(path, format!("malformed JSON: {}", e)))
        }
    }
}

/// Serialize `value` and overwrite the whole file
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let content =
        serde_json::to_string_pretty(value).map_err(|e| PomodoroError::persistence(path, e))?;
    fs::write(path, content).map_err(|e| PomodoroError::persistence(path, e))?;
    debug!(path = %path.display(), "saved");
    Ok(())
}

/// Create the directory a file will live in
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PomodoroError::persistence(parent, e))?;
        }
    }
    Ok(())
}

/// Append-only history of finished sessions, oldest first
#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
    sessions: Vec<Session>,
    recovered: Option<PomodoroError>,
}

impl SessionLog {
    /// Load the log, creating its directory if needed.
    ///
    /// Only a directory that cannot be created is fatal; a corrupt file
    /// yields an empty log.
    pub fn open(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        let (sessions, recovered) = read_json::<Vec<Session>>(path).recover();
        debug!(path = %path.display(), count = sessions.len(), "session log loaded");

        Ok(Self {
            path: path.to_path_buf(),
            sessions,
            recovered,
        })
    }

    /// Record a session and rewrite the file.
    ///
    /// The session stays in memory even when the write fails.
    pub fn append(&mut self, session: Session) -> Result<()> {
        self.sessions.push(session);
        write_json(&self.path, &self.sessions)
    }

    pub fn all(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Forget every recorded session
    pub fn clear(&mut self) -> Result<()> {
        self.sessions.clear();
        write_json(&self.path, &self.sessions)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The load error recovered from in `open`, handed out once
    pub fn take_recovery_warning(&mut self) -> Option<PomodoroError> {
        self.recovered.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKind;
    use chrono::{Local, TimeZone};

    fn work(day: u32) -> Session {
        let at = Local.with_ymd_and_hms(2024, 1, day, 9, 30, 0).unwrap();
        Session::completed(SessionKind::Work, 25, Some(1), at)
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = SessionLog::open(&dir.path().join("sessions.json")).unwrap();
        assert!(log.is_empty());
        assert!(log.take_recovery_warning().is_none());
    }

    #[test]
    fn test_append_persists_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let mut log = SessionLog::open(&path).unwrap();
        log.append(work(1)).unwrap();
        log.append(work(2)).unwrap();

        let reloaded = SessionLog::open(&path).unwrap();
        assert_eq!(reloaded.all(), &[work(1), work(2)]);
    }

    #[test]
    fn test_duplicate_sessions_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = SessionLog::open(&dir.path().join("sessions.json")).unwrap();
        log.append(work(1)).unwrap();
        log.append(work(1)).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_corrupt_file_recovers_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(&path, "{ not json").unwrap();

        let mut log = SessionLog::open(&path).unwrap();
        assert!(log.is_empty());
        let warning = log.take_recovery_warning().unwrap();
        assert!(warning.is_persistence());
        assert!(log.take_recovery_warning().is_none());

        // The next append replaces the corrupt file
        log.append(work(3)).unwrap();
        assert_eq!(SessionLog::open(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let mut log = SessionLog::open(&path).unwrap();
        log.append(work(1)).unwrap();
        log.clear().unwrap();
        assert!(SessionLog::open(&path).unwrap().is_empty());
    }

    #[test]
    fn test_nested_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("sessions.json");
        let mut log = SessionLog::open(&path).unwrap();
        log.append(work(1)).unwrap();
        assert!(path.exists());
    }
}
