//! JSON exports of the task list and the session history

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::session::Session;
use crate::stats::Report;
use crate::store::write_json;
use crate::task::{Task, TaskStore, TaskSummary};

pub const TASKS_EXPORT: &str = "tasks_export.json";
pub const STATS_EXPORT: &str = "stats_export.json";

#[derive(Serialize)]
struct TasksExport<'a> {
    exported_at: DateTime<Local>,
    total_tasks: usize,
    tasks: &'a [Task],
    summary: TaskSummary,
}

#[derive(Serialize)]
struct StatsExport<'a> {
    exported_at: DateTime<Local>,
    total_sessions: usize,
    sessions: &'a [Session],
    report: &'a Report,
}

/// Write every task plus the list summary
pub fn export_tasks(store: &TaskStore, path: &Path, now: DateTime<Local>) -> Result<()> {
    write_json(
        path,
        &TasksExport {
            exported_at: now,
            total_tasks: store.len(),
            tasks: store.all(),
            summary: store.summary(),
        },
    )
}

/// Write the session history plus the computed report
pub fn export_stats(sessions: &[Session], report: &Report, path: &Path, now: DateTime<Local>) -> Result<()> {
    write_json(
        path,
        &StatsExport {
            exported_at: now,
            total_sessions: sessions.len(),
            sessions,
            report,
        },
    )
}
