//! Menu-driven command loop
//!
//! `App` owns the stores, the timer and the collaborators (clock, pacer,
//! notifier, cancel flag) and dispatches typed menu commands. Input comes
//! through the `Input` trait so a script can drive the same loop as a
//! keyboard. End of input anywhere ends the program normally.

use anyhow::Result;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

use pomodoro_core::Paths;

use crate::clock::{Clock, SystemClock};
use crate::display::Display;
use crate::error::PomodoroError;
use crate::export::{self, STATS_EXPORT, TASKS_EXPORT};
use crate::menu::{confirmed, MainCommand, Menu, SettingsCommand, StatsCommand, TaskCommand};
use crate::session::SessionKind;
use crate::settings::SettingsStore;
use crate::stats::Statistics;
use crate::store::SessionLog;
use crate::task::{Priority, TaskStore};
use crate::timer::{
    run_countdown, CancelToken, Completion, CountdownOutcome, Notifier, Pacer, RealTime,
    SilentNotifier, Timer,
};

/// Number of tasks shown under "Top Tasks"
const TOP_TASKS: usize = 5;

/// Last line printed when the program ends on request
pub const GOODBYE: &str = "Goodbye! Keep up the good work!";

/// A source of input lines
pub trait Input {
    /// Next line without its terminator, or None at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Lines typed on the terminal
#[derive(Debug, Default)]
pub struct StdinInput;

impl Input for StdinInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}

/// Canned lines, for tests and scripted runs
#[derive(Debug, Default)]
pub struct ScriptedInput(VecDeque<String>);

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(lines.into_iter().map(Into::into).collect())
    }
}

impl Input for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.0.pop_front())
    }
}

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Read a line or leave the current handler with `Flow::Quit` at end of input
macro_rules! ask {
    ($app:expr, $prompt:expr) => {
        match $app.prompt($prompt)? {
            Some(line) => line,
            None => return Ok(Flow::Quit),
        }
    };
}

pub struct App<I: Input, W: Write> {
    paths: Paths,
    tasks: TaskStore,
    log: SessionLog,
    settings: SettingsStore,
    timer: Timer,
    clock: Box<dyn Clock>,
    pacer: Box<dyn Pacer>,
    notifier: Box<dyn Notifier>,
    cancel: CancelToken,
    display: Display,
    input: I,
    out: W,
}

impl<I: Input, W: Write> App<I, W> {
    /// Open every store under `paths`.
    ///
    /// Fails only when a data directory cannot be created; corrupt files are
    /// reported as warnings once `run` starts.
    pub fn open(paths: Paths, input: I, out: W) -> Result<Self> {
        let tasks = TaskStore::open(&paths.tasks())?;
        let log = SessionLog::open(&paths.sessions())?;
        let settings = SettingsStore::open(&paths.settings())?;
        let timer = Timer::new(settings.get().long_break_interval);

        Ok(Self {
            paths,
            tasks,
            log,
            settings,
            timer,
            clock: Box::new(SystemClock),
            pacer: Box::new(RealTime),
            notifier: Box::new(SilentNotifier),
            cancel: CancelToken::new(),
            display: Display::new(false),
            input,
            out,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Main menu loop; returns when the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        self.report_recovered()?;

        loop {
            self.display.menu::<MainCommand>(&mut self.out)?;
            let Some(command) = self.choose::<MainCommand>()? else {
                return Ok(());
            };
            debug!(?command, "main menu");

            let flow = match command {
                MainCommand::StartTimer => self.start_timer()?,
                MainCommand::ManageTasks => self.manage_tasks()?,
                MainCommand::ViewStatistics => self.view_statistics()?,
                MainCommand::Settings => self.edit_settings()?,
                MainCommand::Exit => Flow::Quit,
            };

            if flow == Flow::Quit {
                writeln!(self.out, "\n{}", GOODBYE)?;
                return Ok(());
            }
        }
    }

    fn report_recovered(&mut self) -> Result<()> {
        let recovered = [
            self.tasks.take_recovery_warning(),
            self.log.take_recovery_warning(),
            self.settings.take_recovery_warning(),
        ];
        for err in recovered.into_iter().flatten() {
            self.display
                .warning(&mut self.out, &format!("{} (starting fresh)", err))?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "\n{}: ", text)?;
        self.out.flush()?;
        let line = self.input.read_line()?;
        if line.is_some() {
            writeln!(self.out)?;
        }
        Ok(line)
    }

    /// Prompt until a valid menu number or end of input
    fn choose<M: Menu>(&mut self) -> Result<Option<M>> {
        loop {
            let Some(line) = self.prompt("Choose option")? else {
                return Ok(None);
            };
            match M::parse(&line) {
                Some(choice) => return Ok(Some(choice)),
                None => self.display.error(&mut self.out, "Invalid choice!")?,
            }
        }
    }

    /// Show the outcome of a store or timer call. Never fatal.
    fn report(&mut self, result: crate::error::Result<()>, success: &str) -> Result<()> {
        match result {
            Ok(()) => self.display.success(&mut self.out, success)?,
            Err(err) => self.report_error(&err)?,
        }
        Ok(())
    }

    fn report_error(&mut self, err: &PomodoroError) -> Result<()> {
        if err.is_persistence() {
            warn!(error = %err, "save failed");
            self.display.warning(&mut self.out, &format!("{} (changes kept in memory)", err))?;
        } else {
            self.display.error(&mut self.out, &err.to_string())?;
        }
        Ok(())
    }

    fn read_task_id(&mut self, prompt: &str) -> Result<Option<Option<u64>>> {
        let Some(line) = self.prompt(prompt)? else {
            return Ok(None);
        };
        match line.trim().trim_start_matches('#').parse::<u64>() {
            Ok(id) => Ok(Some(Some(id))),
            Err(_) => {
                self.display.error(&mut self.out, "Invalid task id!")?;
                Ok(Some(None))
            }
        }
    }

    // ---- timer ----------------------------------------------------------

    fn start_timer(&mut self) -> Result<Flow> {
        self.display.header(&mut self.out)?;

        let pending: Vec<(u64, String)> = self
            .tasks
            .pending()
            .iter()
            .map(|t| (t.id, t.name.clone()))
            .collect();

        let task_id = if pending.is_empty() {
            self.display
                .info(&mut self.out, "No tasks yet. Starting general pomodoro session.")?;
            None
        } else {
            let tasks = self.tasks.pending();
            self.display.task_picker(&mut self.out, &tasks)?;
            let choice = ask!(self, "Select task to work on");
            let picked = choice
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|idx| pending.get(idx));
            match picked {
                Some((id, name)) => {
                    writeln!(self.out, "Working on: {}", name)?;
                    Some(*id)
                }
                None => None,
            }
        };

        loop {
            let _ = ask!(self, "Press ENTER to start the timer");

            let completion = match self.countdown(SessionKind::Work, task_id)? {
                Some(completion) => completion,
                None => return Ok(Flow::Continue),
            };

            let today = Statistics::at(self.log.all(), self.clock.as_ref()).today();
            self.display.success(&mut self.out, "Pomodoro complete!")?;
            writeln!(
                self.out,
                "You've completed {} pomodoro(s) today!",
                today.sessions
            )?;

            let next_break = completion.next_break.unwrap_or(SessionKind::ShortBreak);
            let answer = ask!(self, &format!("Start {}? (y/n)", next_break.label().to_lowercase()));
            if confirmed(&answer) {
                self.countdown(next_break, None)?;
            }

            let again = ask!(self, "Start another pomodoro? (y/n)");
            if !confirmed(&again) {
                return Ok(Flow::Continue);
            }
        }
    }

    /// Run one countdown to completion or interruption.
    ///
    /// Returns the completion when the session counted as completed.
    fn countdown(&mut self, kind: SessionKind, task_id: Option<u64>) -> Result<Option<Completion>> {
        let minutes = self.settings.get().duration_for(kind);
        self.timer.set_long_break_interval(self.settings.get().long_break_interval);

        if let Err(err) = self.timer.start(kind, minutes, task_id, self.clock.now()) {
            self.report_error(&err)?;
            return Ok(None);
        }

        let task = task_id.and_then(|id| self.tasks.get(id)).cloned();
        self.display
            .session_banner(&mut self.out, kind, task.as_ref(), self.clock.now())?;

        self.cancel.reset();
        let silent = SilentNotifier;
        let notifier: &dyn Notifier = if self.settings.get().notifications {
            self.notifier.as_ref()
        } else {
            &silent
        };

        let display = self.display;
        let out = &mut self.out;
        let outcome = run_countdown(
            &mut self.timer,
            &mut self.log,
            self.clock.as_ref(),
            self.pacer.as_mut(),
            &self.cancel,
            notifier,
            |running| {
                let _ = display.countdown(out, running);
            },
        )?;
        writeln!(self.out)?;

        let completion = match outcome {
            CountdownOutcome::Completed(completion) => completion,
            CountdownOutcome::Cancelled => {
                self.cancel.reset();
                return self.stopped(kind);
            }
        };

        self.finish(completion).map(Some)
    }

    /// Handle a Ctrl+C during a countdown
    fn stopped(&mut self, kind: SessionKind) -> Result<Option<Completion>> {
        writeln!(self.out, "\nTimer paused!")?;

        let keep = if kind == SessionKind::Work {
            match self.prompt("Do you want to mark this session as complete? (y/n)")? {
                Some(answer) => confirmed(&answer),
                None => false,
            }
        } else {
            false
        };

        if keep {
            let completion = self.timer.finish_early(&mut self.log, self.clock.now())?;
            self.display.success(&mut self.out, "Session marked as complete!")?;
            return self.finish(completion).map(Some);
        }

        let interruption = self.timer.interrupt(&mut self.log, self.clock.now())?;
        if let Some(err) = &interruption.save_error {
            self.report_error(err)?;
        }
        self.display.error(
            &mut self.out,
            &format!(
                "{} stopped after {} minute(s).",
                kind.label(),
                interruption.session.duration_minutes
            ),
        )?;
        Ok(None)
    }

    fn finish(&mut self, completion: Completion) -> Result<Completion> {
        if let Some(err) = &completion.save_error {
            self.report_error(err)?;
        }
        let session = &completion.session;
        if session.kind == SessionKind::Work {
            if let Some(id) = session.task_id {
                if let Err(err) = self.tasks.record_pomodoro(id) {
                    self.report_error(&err)?;
                }
            }
        } else {
            self.display.success(&mut self.out, "Break complete! Time to get back to work!")?;
        }
        Ok(completion)
    }

    // ---- tasks ----------------------------------------------------------

    fn manage_tasks(&mut self) -> Result<Flow> {
        loop {
            self.display.menu::<TaskCommand>(&mut self.out)?;
            let Some(command) = self.choose::<TaskCommand>()? else {
                return Ok(Flow::Quit);
            };
            debug!(?command, "task menu");

            let flow = match command {
                TaskCommand::List => self.list_tasks()?,
                TaskCommand::Add => self.add_task()?,
                TaskCommand::Complete => self.with_task_id("Enter task id to complete", |app, id| {
                    let result = app.tasks.complete(id);
                    app.report(result, "Task marked as complete!")
                })?,
                TaskCommand::Uncomplete => self.with_task_id("Enter task id to reopen", |app, id| {
                    let result = app.tasks.uncomplete(id);
                    app.report(result, "Task reopened!")
                })?,
                TaskCommand::Delete => self.with_task_id("Enter task id to delete", |app, id| {
                    let result = app.tasks.delete(id).map(|_| ());
                    app.report(result, "Task deleted!")
                })?,
                TaskCommand::Rename => self.rename_task()?,
                TaskCommand::SetPriority => self.set_priority()?,
                TaskCommand::Search => self.search_tasks()?,
                TaskCommand::SortByPriority => {
                    let result = self.tasks.sort_by_priority();
                    self.report(result, "Tasks sorted by priority!")?;
                    Flow::Continue
                }
                TaskCommand::ClearCompleted => {
                    match self.tasks.clear_completed() {
                        Ok(n) => self
                            .display
                            .success(&mut self.out, &format!("Removed {} completed task(s)", n))?,
                        Err(err) => self.report_error(&err)?,
                    }
                    Flow::Continue
                }
                TaskCommand::Export => {
                    let path = self.paths.export(TASKS_EXPORT);
                    let result = export::export_tasks(&self.tasks, &path, self.clock.now());
                    self.report(result, &format!("Tasks exported to {}", path.display()))?;
                    Flow::Continue
                }
                TaskCommand::Back => return Ok(Flow::Continue),
            };

            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn list_tasks(&mut self) -> Result<Flow> {
        let tasks = self.tasks.list(None);
        self.display.task_list(&mut self.out, &tasks)?;
        if !tasks.is_empty() {
            self.display.task_summary(&mut self.out, &self.tasks)?;
        }
        Ok(Flow::Continue)
    }

    fn add_task(&mut self) -> Result<Flow> {
        let name = ask!(self, "Enter task name");
        if name.trim().is_empty() {
            self.display.error(&mut self.out, "Task name cannot be empty!")?;
            return Ok(Flow::Continue);
        }

        let answer = ask!(self, "Priority (high/medium/low) [medium]");
        let priority = if answer.trim().is_empty() {
            Priority::default()
        } else {
            match Priority::parse(&answer) {
                Some(p) => p,
                None => {
                    self.display.error(&mut self.out, "Invalid priority!")?;
                    return Ok(Flow::Continue);
                }
            }
        };

        let result = self.tasks.add(&name, priority).map(|_| ());
        self.report(result, "Task added successfully!")?;
        Ok(Flow::Continue)
    }

    /// List tasks, read an id, and run `action` with it
    fn with_task_id<F>(&mut self, prompt: &str, action: F) -> Result<Flow>
    where
        F: FnOnce(&mut Self, u64) -> Result<()>,
    {
        self.list_tasks()?;
        match self.read_task_id(prompt)? {
            None => Ok(Flow::Quit),
            Some(None) => Ok(Flow::Continue),
            Some(Some(id)) => {
                action(self, id)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn rename_task(&mut self) -> Result<Flow> {
        self.list_tasks()?;
        let id = match self.read_task_id("Enter task id to rename")? {
            None => return Ok(Flow::Quit),
            Some(None) => return Ok(Flow::Continue),
            Some(Some(id)) => id,
        };
        let name = ask!(self, "Enter new name");
        let result = self.tasks.rename(id, &name);
        self.report(result, "Task renamed!")?;
        Ok(Flow::Continue)
    }

    fn set_priority(&mut self) -> Result<Flow> {
        self.list_tasks()?;
        let id = match self.read_task_id("Enter task id")? {
            None => return Ok(Flow::Quit),
            Some(None) => return Ok(Flow::Continue),
            Some(Some(id)) => id,
        };
        let answer = ask!(self, "Priority (high/medium/low)");
        let Some(priority) = Priority::parse(&answer) else {
            self.display.error(&mut self.out, "Invalid priority!")?;
            return Ok(Flow::Continue);
        };
        let result = self.tasks.set_priority(id, priority);
        self.report(result, "Priority updated!")?;
        Ok(Flow::Continue)
    }

    fn search_tasks(&mut self) -> Result<Flow> {
        let keyword = ask!(self, "Search for");
        let found = self.tasks.search(keyword.trim());
        self.display.task_list(&mut self.out, &found)?;
        Ok(Flow::Continue)
    }

    // ---- statistics -----------------------------------------------------

    fn view_statistics(&mut self) -> Result<Flow> {
        loop {
            self.display.menu::<StatsCommand>(&mut self.out)?;
            let Some(command) = self.choose::<StatsCommand>()? else {
                return Ok(Flow::Quit);
            };
            debug!(?command, "statistics menu");

            match command {
                StatsCommand::Report => {
                    let report = Statistics::at(self.log.all(), self.clock.as_ref()).report(TOP_TASKS);
                    self.display.report(&mut self.out, &report, &self.tasks)?;
                }
                StatsCommand::Export => {
                    let report = Statistics::at(self.log.all(), self.clock.as_ref()).report(TOP_TASKS);
                    let path = self.paths.export(STATS_EXPORT);
                    let result = export::export_stats(self.log.all(), &report, &path, self.clock.now());
                    self.report(result, &format!("Statistics exported to {}", path.display()))?;
                }
                StatsCommand::Clear => {
                    let answer = ask!(self, "Delete the whole session history? (y/n)");
                    if confirmed(&answer) {
                        let result = self.log.clear();
                        self.report(result, "Session history cleared!")?;
                    }
                }
                StatsCommand::Back => return Ok(Flow::Continue),
            }
        }
    }

    // ---- settings -------------------------------------------------------

    fn edit_settings(&mut self) -> Result<Flow> {
        loop {
            self.display.settings(&mut self.out, self.settings.get())?;
            self.display.menu::<SettingsCommand>(&mut self.out)?;
            let Some(command) = self.choose::<SettingsCommand>()? else {
                return Ok(Flow::Quit);
            };
            debug!(?command, "settings menu");

            match command {
                SettingsCommand::Edit(field) => {
                    let answer = ask!(self, &format!("Enter {}", field.label().to_lowercase()));
                    match answer.trim().parse::<u32>() {
                        Ok(value) => {
                            let result = self.settings.set(field, value);
                            self.report(result, "Setting updated!")?;
                        }
                        Err(_) => self.display.error(&mut self.out, "Invalid input!")?,
                    }
                }
                SettingsCommand::ToggleNotifications => match self.settings.toggle_notifications() {
                    Ok(on) => self.display.success(
                        &mut self.out,
                        if on { "Notifications on" } else { "Notifications off" },
                    )?,
                    Err(err) => self.report_error(&err)?,
                },
                SettingsCommand::Reset => {
                    let result = self.settings.reset();
                    self.report(result, "Settings reset to default!")?;
                }
                SettingsCommand::Back => return Ok(Flow::Continue),
            }
            self.timer
                .set_long_break_interval(self.settings.get().long_break_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::timer::NoDelay;
    use chrono::{Local, TimeZone};

    type TestApp = App<ScriptedInput, Vec<u8>>;

    /// Pacer that trips the cancel flag on its first wait, like a Ctrl+C
    struct InterruptAtOnce(CancelToken);

    impl Pacer for InterruptAtOnce {
        fn wait_second(&mut self) {
            assert!(self.0.request_stop(), "countdown should be listening");
        }
    }

    fn clock() -> FixedClock {
        FixedClock(Local.with_ymd_and_hms(2024, 5, 8, 10, 0, 0).unwrap())
    }

    fn app(dir: &tempfile::TempDir, lines: &[&str]) -> TestApp {
        App::open(
            Paths::rooted_at(dir.path()),
            ScriptedInput::new(lines.iter().copied()),
            Vec::new(),
        )
        .unwrap()
        .with_clock(clock())
        .with_pacer(NoDelay)
    }

    fn run(dir: &tempfile::TempDir, lines: &[&str]) -> (TestApp, String) {
        let mut app = app(dir, lines);
        app.run().unwrap();
        let output = String::from_utf8(app.out.clone()).unwrap();
        (app, output)
    }

    #[test]
    fn test_exit_and_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let (_, output) = run(&dir, &["5"]);
        assert!(output.contains("Goodbye"));

        let (_, output) = run(&dir, &[]);
        assert!(output.contains("MAIN MENU"));
    }

    #[test]
    fn test_invalid_choice_returns_to_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let (_, output) = run(&dir, &["9", "abc", "5"]);
        assert_eq!(output.matches("Invalid choice!").count(), 2);
        assert!(output.contains("Goodbye"));
    }

    #[test]
    fn test_add_and_complete_task() {
        let dir = tempfile::tempdir().unwrap();
        let (app, output) = run(
            &dir,
            &["2", "2", "Write report", "high", "3", "1", "12", "5"],
        );
        assert!(output.contains("Task added successfully!"));
        assert!(output.contains("Task marked as complete!"));

        let task = &app.tasks().all()[0];
        assert_eq!(task.name, "Write report");
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);

        // Persisted for the next run
        let reopened = TaskStore::open(&dir.path().join("tasks.json")).unwrap();
        assert_eq!(reopened.all(), app.tasks().all());
    }

    #[test]
    fn test_unknown_task_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (_, output) = run(&dir, &["2", "5", "42", "3", "x", "12", "5"]);
        assert!(output.contains("Task #42 not found"));
        assert!(output.contains("Invalid task id!"));
        assert!(output.contains("Goodbye"));
    }

    #[test]
    fn test_invalid_setting_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (app, output) = run(&dir, &["4", "1", "0", "2", "10", "7", "5"]);
        assert!(output.contains("must be between 1 and"));
        assert_eq!(app.settings().get().pomodoro_minutes, 25);
        assert_eq!(app.settings().get().short_break_minutes, 10);
    }

    #[test]
    fn test_pomodoro_with_task_and_break() {
        let dir = tempfile::tempdir().unwrap();
        let (app, output) = run(
            &dir,
            &[
                "2", "2", "Write report", "", "12", // add a task
                "1", "1", "", // work on it
                "y", // take the short break
                "n", // no more pomodoros
                "5",
            ],
        );
        assert!(output.contains("Working on: Write report"));
        assert!(output.contains("Pomodoro complete!"));
        assert!(output.contains("You've completed 1 pomodoro(s) today!"));
        assert!(output.contains("Break complete!"));

        let sessions = app.log().all();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].kind, SessionKind::Work);
        assert_eq!(sessions[0].task_id, Some(1));
        assert_eq!(sessions[0].duration_minutes, 25);
        assert_eq!(sessions[0].completed_at, clock().now());
        assert_eq!(sessions[1].kind, SessionKind::ShortBreak);
        assert_eq!(app.tasks().get(1).unwrap().pomodoros, 1);
    }

    #[test]
    fn test_failed_writes_warn_and_keep_changes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tasks.json")).unwrap();
        std::fs::create_dir(dir.path().join("sessions.json")).unwrap();

        let (app, output) = run(
            &dir,
            &[
                "2", "2", "Write", "", "12", // add a task
                "1", "1", "", // work on it
                "n", "n", // no break, no more pomodoros
                "5",
            ],
        );

        let kept: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("[warn]") && line.contains("(changes kept in memory)"))
            .collect();
        assert!(kept.iter().any(|line| line.contains("tasks.json")));
        assert!(kept.iter().any(|line| line.contains("sessions.json")));
        assert!(output.contains("Goodbye"));

        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.tasks().get(1).unwrap().pomodoros, 1);
        assert_eq!(app.log().len(), 1);
        assert_eq!(app.log().all()[0].kind, SessionKind::Work);
    }

    #[test]
    fn test_fourth_pomodoro_offers_long_break() {
        let dir = tempfile::tempdir().unwrap();
        let (_, output) = run(
            &dir,
            &[
                "1", "", "n", "y", // 1st, skip break, again
                "", "n", "y", // 2nd
                "", "n", "y", // 3rd
                "", "n", "n", // 4th
                "5",
            ],
        );
        assert_eq!(output.matches("Start short break? (y/n)").count(), 3);
        assert_eq!(output.matches("Start long break? (y/n)").count(), 1);
    }

    #[test]
    fn test_interrupted_pomodoro_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = CancelToken::new();
        let mut app = app(&dir, &["1", "", "n", "5"])
            .with_cancel(cancel.clone())
            .with_pacer(InterruptAtOnce(cancel.clone()));
        app.run().unwrap();
        let output = String::from_utf8(app.out.clone()).unwrap();

        // Back at the menu, Ctrl+C is no longer a pause
        assert!(!cancel.request_stop());
        assert!(output.contains("Timer paused!"));
        assert!(output.contains("Pomodoro stopped after 0 minute(s)."));
        let sessions = app.log().all();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].was_interrupted);
        assert_eq!(sessions[0].duration_minutes, 0);
    }

    #[test]
    fn test_interrupted_pomodoro_can_count_as_complete() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = CancelToken::new();
        let mut app = app(&dir, &["1", "", "y", "n", "n", "5"])
            .with_cancel(cancel.clone())
            .with_pacer(InterruptAtOnce(cancel));
        app.run().unwrap();

        let sessions = app.log().all();
        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].was_interrupted);
        assert_eq!(sessions[0].duration_minutes, 25);
    }

    #[test]
    fn test_statistics_report() {
        let dir = tempfile::tempdir().unwrap();
        let (_, output) = run(&dir, &["1", "", "n", "n", "3", "1", "2", "4", "5"]);
        assert!(output.contains("Productivity Statistics"));
        assert!(output.contains("1 pomodoros (25m)"));
        assert!(output.contains("Statistics exported to"));
        assert!(dir.path().join(STATS_EXPORT).exists());
    }

    #[test]
    fn test_corrupt_file_warns_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sessions.json"), "[{broken").unwrap();
        let (app, output) = run(&dir, &["5"]);
        assert!(output.contains("[warn]"));
        assert!(output.contains("starting fresh"));
        assert!(app.log().is_empty());
    }
}
