//! Terminal rendering
//!
//! Everything the menus print goes through `Display`, so color can be
//! switched off for pipes and tests.

use chrono::{DateTime, Local};
use std::io::{self, Write};

use pomodoro_core::format;

use crate::menu::Menu;
use crate::session::SessionKind;
use crate::settings::Settings;
use crate::stats::Report;
use crate::task::{Priority, Task, TaskStore};
use crate::timer::RunningTimer;

// ANSI color codes
const RED: &str = "\x1b[0;31m";
const GREEN: &str = "\x1b[0;32m";
const YELLOW: &str = "\x1b[0;33m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy)]
pub struct Display {
    colors: bool,
}

impl Display {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Colors only when stdout is a TTY
    pub fn detect() -> Self {
        Self::new(std::io::IsTerminal::is_terminal(&std::io::stdout()))
    }

    /// Conditionally apply color
    fn color(&self, code: &str, text: &str) -> String {
        if self.colors {
            format!("{}{}{}", code, text, NC)
        } else {
            text.to_string()
        }
    }

    fn rule(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))
    }

    pub fn header(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.color(&format!("{}{}", BOLD, MAGENTA), "POMODORO TIMER"))
    }

    pub fn menu<M: Menu>(&self, out: &mut dyn Write) -> io::Result<()> {
        self.header(out)?;
        writeln!(out, "\n{}", self.color(BOLD, M::TITLE))?;
        self.rule(out)?;
        for (idx, entry) in M::entries().iter().enumerate() {
            writeln!(out, "{}. {}", idx + 1, entry.label())?;
        }
        self.rule(out)
    }

    pub fn success(&self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        writeln!(out, "{} {}", self.color(GREEN, "[ok]"), message)
    }

    pub fn info(&self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        writeln!(out, "{} {}", self.color(CYAN, "[info]"), message)
    }

    pub fn warning(&self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        writeln!(out, "{} {}", self.color(YELLOW, "[warn]"), message)
    }

    pub fn error(&self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        writeln!(out, "{} {}", self.color(RED, "[error]"), message)
    }

    fn priority(&self, priority: Priority) -> String {
        let code = match priority {
            Priority::High => RED,
            Priority::Medium => YELLOW,
            Priority::Low => GREEN,
        };
        self.color(code, &priority.as_str().to_uppercase())
    }

    fn task_line(&self, out: &mut dyn Write, task: &Task) -> io::Result<()> {
        let mark = if task.completed { "x" } else { " " };
        writeln!(
            out,
            "  #{:<3} [{}] {:<32} {:<8} pomodoros: {}",
            task.id,
            mark,
            format::truncate(&task.name, 32),
            self.priority(task.priority),
            task.pomodoros
        )
    }

    pub fn task_list(&self, out: &mut dyn Write, tasks: &[&Task]) -> io::Result<()> {
        if tasks.is_empty() {
            return self.info(out, "No tasks yet. Add some tasks to get started!");
        }
        writeln!(out)?;
        for task in tasks {
            self.task_line(out, task)?;
        }
        Ok(())
    }

    pub fn task_summary(&self, out: &mut dyn Write, store: &TaskStore) -> io::Result<()> {
        let summary = store.summary();
        writeln!(
            out,
            "\nTotal: {} tasks ({} pending, {} completed, {}% done)",
            summary.total, summary.pending, summary.completed, summary.completion_rate
        )
    }

    /// Numbered pending tasks for the timer's task picker
    pub fn task_picker(&self, out: &mut dyn Write, tasks: &[&Task]) -> io::Result<()> {
        writeln!(out, "\n{}", self.color(BOLD, "Your Tasks:"))?;
        for (idx, task) in tasks.iter().enumerate() {
            writeln!(out, "{}. {} ({})", idx + 1, task.name, self.priority(task.priority))?;
        }
        writeln!(out, "{}. Work without specific task", tasks.len() + 1)
    }

    pub fn settings(&self, out: &mut dyn Write, settings: &Settings) -> io::Result<()> {
        writeln!(out, "\n{}", self.color(BOLD, "Current settings"))?;
        writeln!(out, "  {}     {} min", self.color(CYAN, "Pomodoro:"), settings.pomodoro_minutes)?;
        writeln!(out, "  {}  {} min", self.color(CYAN, "Short break:"), settings.short_break_minutes)?;
        writeln!(out, "  {}   {} min", self.color(CYAN, "Long break:"), settings.long_break_minutes)?;
        writeln!(
            out,
            "  {}  every {} pomodoros",
            self.color(CYAN, "Long break:"),
            settings.long_break_interval
        )?;
        writeln!(
            out,
            "  {} {}",
            self.color(CYAN, "Notifications:"),
            if settings.notifications { "on" } else { "off" }
        )
    }

    pub fn session_banner(
        &self,
        out: &mut dyn Write,
        kind: SessionKind,
        task: Option<&Task>,
        started_at: DateTime<Local>,
    ) -> io::Result<()> {
        let title = match kind {
            SessionKind::Work => "POMODORO SESSION",
            SessionKind::ShortBreak => "SHORT BREAK",
            SessionKind::LongBreak => "LONG BREAK",
        };
        writeln!(out, "\n{}", self.color(&format!("{}{}", BOLD, MAGENTA), title))?;
        self.rule(out)?;
        match (kind, task) {
            (SessionKind::Work, Some(task)) => writeln!(out, "Working on: {}", task.name)?,
            (SessionKind::ShortBreak, _) => writeln!(out, "Take a quick rest!")?,
            (SessionKind::LongBreak, _) => writeln!(out, "Great job! Take a longer break!")?,
            _ => {}
        }
        writeln!(out, "Started at: {}", format::time(started_at))?;
        writeln!(out, "Press Ctrl+C to pause/stop")
    }

    /// One countdown line, redrawn in place
    pub fn countdown(&self, out: &mut dyn Write, running: &RunningTimer) -> io::Result<()> {
        let filled = (20 * running.progress_percent() as usize) / 100;
        write!(
            out,
            "\r  {} [{}{}] {}%  ",
            self.color(CYAN, &format::clock(running.remaining_seconds)),
            "\u{2588}".repeat(filled),
            "\u{2591}".repeat(20 - filled),
            running.progress_percent()
        )?;
        out.flush()
    }

    pub fn report(&self, out: &mut dyn Write, report: &Report, tasks: &TaskStore) -> io::Result<()> {
        writeln!(out, "\n{}", self.color(BOLD, "Productivity Statistics"))?;
        self.rule(out)?;
        writeln!(
            out,
            "  {}       {} pomodoros ({})",
            self.color(CYAN, "Today:"),
            report.today.sessions,
            format::minutes(report.today.minutes)
        )?;
        writeln!(
            out,
            "  {}   {} pomodoros ({})",
            self.color(CYAN, "This week:"),
            report.this_week.sessions,
            format::minutes(report.this_week.minutes)
        )?;
        writeln!(
            out,
            "  {}    {} pomodoros ({})",
            self.color(CYAN, "All time:"),
            report.all_time.sessions,
            format::minutes(report.all_time.minutes)
        )?;
        writeln!(out, "  {}      {} day(s)", self.color(CYAN, "Streak:"), report.streak)?;
        match report.best_day {
            Some((date, count)) => writeln!(
                out,
                "  {}    {} ({} pomodoros)",
                self.color(CYAN, "Best day:"),
                date.format("%Y-%m-%d"),
                count
            )?,
            None => writeln!(out, "  {}    -", self.color(CYAN, "Best day:"))?,
        }
        writeln!(out, "  {}  {}%", self.color(CYAN, "Completion:"), report.completion_rate)?;

        if !report.top_tasks.is_empty() {
            writeln!(out, "\n{}", self.color(BOLD, "Top Tasks"))?;
            self.rule(out)?;
            for tally in &report.top_tasks {
                let name = match tasks.get(tally.task_id) {
                    Some(task) => task.name.clone(),
                    None => format!("Task #{} (deleted)", tally.task_id),
                };
                writeln!(
                    out,
                    "  {}: {} pomodoros ({})",
                    name,
                    tally.sessions,
                    format::minutes(tally.minutes)
                )?;
            }
        }

        writeln!(out, "\n{}", self.color(BOLD, "This Week's Activity"))?;
        self.rule(out)?;
        let max = report.week_chart.iter().map(|(_, c)| *c).max().unwrap_or(0);
        for (day, count) in &report.week_chart {
            writeln!(out, "  {}: {} {}", day, format::bar(*count, max, 20), count)?;
        }
        self.rule(out)
    }
}
