//! Todo list
//!
//! Tasks keep their insertion order and an id that is never handed out
//! twice, even after the task holding it is deleted. The high-water mark is
//! persisted next to the tasks.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PomodoroError, Result};
use crate::store::{ensure_parent, read_json, write_json, Loaded};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" | "1" => Some(Priority::High),
            "medium" | "m" | "2" => Some(Priority::Medium),
            "low" | "l" | "3" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Sort rank, highest priority first
    fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
    /// Completed pomodoros spent on this task
    #[serde(default)]
    pub pomodoros: u32,
}

/// Optional constraints for `TaskStore::list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn pending() -> Self {
        Self {
            completed: Some(false),
            ..Default::default()
        }
    }

    pub fn completed() -> Self {
        Self {
            completed: Some(true),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.completed.map_or(true, |c| task.completed == c)
            && self.priority.map_or(true, |p| task.priority == p)
    }
}

/// Counts over the whole list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// Completed share, 0-100
    pub completion_rate: u32,
    pub total_pomodoros: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskFile {
    next_id: u64,
    tasks: Vec<Task>,
}

/// Accepts both the current object layout and a bare array of tasks
#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Current(TaskFile),
    Legacy(Vec<Task>),
}

/// Task list synchronized to a JSON file on every mutation
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    next_id: u64,
    tasks: Vec<Task>,
    recovered: Option<PomodoroError>,
}

impl TaskStore {
    /// Load the task list; a corrupt file yields an empty list
    pub fn open(path: &Path) -> Result<Self> {
        ensure_parent(path)?;

        let (file, recovered) = match read_json::<OnDisk>(path) {
            Loaded::Missing => (TaskFile::default(), None),
            Loaded::Found(OnDisk::Current(file)) => (file, None),
            Loaded::Found(OnDisk::Legacy(tasks)) => (TaskFile { next_id: 0, tasks }, None),
            Loaded::Corrupt(err) => (TaskFile::default(), Some(err)),
        };

        let mut store = Self {
            path: path.to_path_buf(),
            next_id: file.next_id,
            tasks: file.tasks,
            recovered,
        };
        store.next_id = store.next_id.max(store.max_id() + 1);
        debug!(path = %path.display(), count = store.tasks.len(), next_id = store.next_id, "tasks loaded");

        Ok(store)
    }

    fn max_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0)
    }

    fn save(&self) -> Result<()> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            next_id: u64,
            tasks: &'a [Task],
        }

        write_json(
            &self.path,
            &Borrowed {
                next_id: self.next_id,
                tasks: &self.tasks,
            },
        )
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(PomodoroError::NotFound(id))
    }

    fn task_mut(&mut self, id: u64) -> Result<&mut Task> {
        let idx = self.position(id)?;
        Ok(&mut self.tasks[idx])
    }

    fn clean_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PomodoroError::invalid("Task name cannot be empty"));
        }
        Ok(name.to_string())
    }

    /// Add a task and persist.
    ///
    /// The returned task is in the list even if the write failed; the error
    /// is the only sign of it.
    pub fn add(&mut self, name: &str, priority: Priority) -> Result<Task> {
        self.add_at(name, priority, Local::now())
    }

    pub fn add_at(&mut self, name: &str, priority: Priority, created_at: DateTime<Local>) -> Result<Task> {
        let name = Self::clean_name(name)?;
        let id = self.next_id.max(self.max_id() + 1);
        self.next_id = id + 1;

        let task = Task {
            id,
            name,
            priority,
            completed: false,
            created_at,
            completed_at: None,
            pomodoros: 0,
        };
        self.tasks.push(task.clone());
        info!(id, name = %task.name, "task added");

        self.save()?;
        Ok(task)
    }

    /// Mark a task as done
    pub fn complete(&mut self, id: u64) -> Result<()> {
        let task = self.task_mut(id)?;
        task.completed = true;
        task.completed_at = Some(Local::now());
        self.save()
    }

    /// Put a completed task back on the pending list
    pub fn uncomplete(&mut self, id: u64) -> Result<()> {
        let task = self.task_mut(id)?;
        task.completed = false;
        task.completed_at = None;
        self.save()
    }

    /// Remove a task. Its id is not reused.
    pub fn delete(&mut self, id: u64) -> Result<Task> {
        let idx = self.position(id)?;
        let task = self.tasks.remove(idx);
        info!(id, "task deleted");
        self.save()?;
        Ok(task)
    }

    pub fn rename(&mut self, id: u64, name: &str) -> Result<()> {
        let name = Self::clean_name(name)?;
        self.task_mut(id)?.name = name;
        self.save()
    }

    pub fn set_priority(&mut self, id: u64, priority: Priority) -> Result<()> {
        self.task_mut(id)?.priority = priority;
        self.save()
    }

    /// Credit a completed pomodoro to a task.
    ///
    /// Returns false without touching the file when the task no longer exists.
    pub fn record_pomodoro(&mut self, id: u64) -> Result<bool> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.pomodoros += 1;
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in insertion order, optionally filtered
    pub fn list(&self, filter: Option<TaskFilter>) -> Vec<&Task> {
        let filter = filter.unwrap_or_default();
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn pending(&self) -> Vec<&Task> {
        self.list(Some(TaskFilter::pending()))
    }

    /// Case-insensitive substring search on task names
    pub fn search(&self, keyword: &str) -> Vec<&Task> {
        let keyword = keyword.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&keyword))
            .collect()
    }

    /// Drop every completed task, returning how many were removed
    pub fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Pending before completed, then high to low priority. Stable.
    pub fn sort_by_priority(&mut self) -> Result<()> {
        self.tasks.sort_by_key(|t| (t.completed, t.priority.rank()));
        self.save()
    }

    pub fn summary(&self) -> TaskSummary {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed * 100) / total) as u32
        };

        TaskSummary {
            total,
            pending: total - completed,
            completed,
            completion_rate,
            total_pomodoros: self.tasks.iter().map(|t| t.pomodoros).sum(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The load error recovered from in `open`, handed out once
    pub fn take_recovery_warning(&mut self) -> Option<PomodoroError> {
        self.recovered.take()
    }
}
