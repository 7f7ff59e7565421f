//! Countdown state machine
//!
//! ```text
//! IDLE -> RUNNING(kind, remaining, task?) -> COMPLETED | INTERRUPTED -> IDLE
//! ```
//!
//! A natural completion appends the session to the log and advances the
//! work/break cycle. An interruption records the partial session with
//! `was_interrupted` set and the elapsed whole minutes, and leaves the cycle
//! alone. `finish_early` lets the user count a stopped pomodoro as done.

use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{PomodoroError, Result};
use crate::session::{Session, SessionKind};
use crate::store::SessionLog;

/// A countdown in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTimer {
    pub kind: SessionKind,
    pub planned_minutes: u32,
    pub remaining_seconds: u64,
    pub task_id: Option<u64>,
    pub started_at: DateTime<Local>,
}

impl RunningTimer {
    pub fn elapsed_seconds(&self) -> u64 {
        (self.planned_minutes as u64 * 60).saturating_sub(self.remaining_seconds)
    }

    /// Progress as a percentage (0-100)
    pub fn progress_percent(&self) -> u32 {
        let total = self.planned_minutes as u64 * 60;
        if total == 0 {
            return 100;
        }
        ((self.elapsed_seconds() * 100) / total).min(100) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running(RunningTimer),
    Completed(Session),
    Interrupted(Session),
}

/// A session that reached the log, plus what comes next
#[derive(Debug)]
pub struct Completion {
    pub session: Session,
    /// Suggested break after a work session
    pub next_break: Option<SessionKind>,
    /// The log write failed; the session is only in memory
    pub save_error: Option<PomodoroError>,
}

/// A partial session recorded on interruption
#[derive(Debug)]
pub struct Interruption {
    pub session: Session,
    pub save_error: Option<PomodoroError>,
}

#[derive(Debug)]
pub enum Tick {
    Running { remaining_seconds: u64 },
    Completed(Completion),
}

/// Timer plus the process-wide cycle counter
#[derive(Debug)]
pub struct Timer {
    state: TimerState,
    /// Completed work sessions since the last long break
    cycle: u32,
    long_break_interval: u32,
}

impl Timer {
    pub fn new(long_break_interval: u32) -> Self {
        Self {
            state: TimerState::Idle,
            cycle: 0,
            long_break_interval: long_break_interval.max(1),
        }
    }

    pub fn set_long_break_interval(&mut self, interval: u32) {
        self.long_break_interval = interval.max(1);
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running(_))
    }

    pub fn running(&self) -> Option<&RunningTimer> {
        match &self.state {
            TimerState::Running(running) => Some(running),
            _ => None,
        }
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        self.running().map(|r| r.remaining_seconds)
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle
    }

    /// The break that should follow the work session just completed.
    /// Every `long_break_interval`-th work session earns a long one, whether
    /// or not earlier long breaks were taken.
    pub fn next_break(&self) -> SessionKind {
        if self.cycle > 0 && self.cycle % self.long_break_interval == 0 {
            SessionKind::LongBreak
        } else {
            SessionKind::ShortBreak
        }
    }

    /// Begin a countdown. A finished timer is implicitly back to idle.
    pub fn start(
        &mut self,
        kind: SessionKind,
        duration_minutes: u32,
        task_id: Option<u64>,
        now: DateTime<Local>,
    ) -> Result<()> {
        if self.is_running() {
            return Err(PomodoroError::invalid("A timer is already running"));
        }
        if duration_minutes == 0 {
            return Err(PomodoroError::invalid("Timer duration must be at least one minute"));
        }

        info!(kind = %kind, duration_minutes, ?task_id, "timer started");
        self.state = TimerState::Running(RunningTimer {
            kind,
            planned_minutes: duration_minutes,
            remaining_seconds: duration_minutes as u64 * 60,
            task_id,
            started_at: now,
        });
        Ok(())
    }

    /// Advance one second; at zero the session is completed and logged
    pub fn tick(&mut self, log: &mut SessionLog, now: DateTime<Local>) -> Result<Tick> {
        let running = match &mut self.state {
            TimerState::Running(running) => running,
            _ => return Err(PomodoroError::invalid("No timer is running")),
        };

        running.remaining_seconds = running.remaining_seconds.saturating_sub(1);
        if running.remaining_seconds > 0 {
            return Ok(Tick::Running {
                remaining_seconds: running.remaining_seconds,
            });
        }

        let running = running.clone();
        Ok(Tick::Completed(self.complete(running, log, now)))
    }

    /// Count a stopped session as completed at its planned length
    pub fn finish_early(&mut self, log: &mut SessionLog, now: DateTime<Local>) -> Result<Completion> {
        let running = self
            .running()
            .cloned()
            .ok_or_else(|| PomodoroError::invalid("No timer is running"))?;
        debug!(remaining = running.remaining_seconds, "finishing early");
        Ok(self.complete(running, log, now))
    }

    /// Stop the countdown and record what was done so far
    pub fn interrupt(&mut self, log: &mut SessionLog, now: DateTime<Local>) -> Result<Interruption> {
        let running = self
            .running()
            .cloned()
            .ok_or_else(|| PomodoroError::invalid("No timer is running"))?;

        let elapsed_minutes = (running.elapsed_seconds() / 60) as u32;
        let session = Session::interrupted(running.kind, elapsed_minutes, running.task_id, now);
        info!(kind = %running.kind, elapsed_minutes, "timer interrupted");

        let save_error = log.append(session.clone()).err();
        if let Some(err) = &save_error {
            warn!(error = %err, "failed to save interrupted session");
        }

        self.state = TimerState::Interrupted(session.clone());
        Ok(Interruption { session, save_error })
    }

    /// Return a finished timer to idle
    pub fn reset(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(PomodoroError::invalid("Stop the running timer first"));
        }
        self.state = TimerState::Idle;
        Ok(())
    }

    fn complete(&mut self, running: RunningTimer, log: &mut SessionLog, now: DateTime<Local>) -> Completion {
        let session = Session::completed(running.kind, running.planned_minutes, running.task_id, now);

        match running.kind {
            SessionKind::Work => self.cycle += 1,
            SessionKind::LongBreak => self.cycle = 0,
            SessionKind::ShortBreak => {}
        }
        info!(kind = %running.kind, cycle = self.cycle, "timer completed");

        let save_error = log.append(session.clone()).err();
        if let Some(err) = &save_error {
            warn!(error = %err, "failed to save completed session");
        }

        let next_break = (running.kind == SessionKind::Work).then(|| self.next_break());
        self.state = TimerState::Completed(session.clone());

        Completion {
            session,
            next_break,
            save_error,
        }
    }
}

/// Waits out one second of countdown
pub trait Pacer {
    fn wait_second(&mut self);
}

/// Real time: sleeps the calling thread
#[derive(Debug, Default)]
pub struct RealTime;

impl Pacer for RealTime {
    fn wait_second(&mut self) {
        std::thread::sleep(Duration::from_secs(1));
    }
}

/// Never blocks; scripted runs and tests
#[derive(Debug, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn wait_second(&mut self) {}
}

/// Shared interruption flag, set from the Ctrl+C handler.
///
/// The flag is only honoured while a countdown has armed the token; outside
/// a countdown `request_stop` reports that nobody is listening.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    armed: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// Stop the running countdown. Returns false when none is running.
    pub fn request_stop(&self) -> bool {
        if !self.is_armed() {
            return false;
        }
        self.cancel();
        true
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    fn arm(&self) {
        self.reset();
        self.armed.store(true, Ordering::SeqCst);
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

/// Told when a countdown runs out on its own
pub trait Notifier {
    fn session_finished(&self, kind: SessionKind, duration_minutes: u32);
}

/// Discards notifications
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn session_finished(&self, _kind: SessionKind, _duration_minutes: u32) {}
}

#[derive(Debug)]
pub enum CountdownOutcome {
    Completed(Completion),
    /// Cancelled between ticks; the timer is still RUNNING so the caller can
    /// choose between `interrupt` and `finish_early`
    Cancelled,
}

/// Block until the running timer reaches zero or the token is cancelled.
///
/// `on_tick` sees the timer before every one-second wait.
pub fn run_countdown<F>(
    timer: &mut Timer,
    log: &mut SessionLog,
    clock: &dyn Clock,
    pacer: &mut dyn Pacer,
    cancel: &CancelToken,
    notifier: &dyn Notifier,
    on_tick: F,
) -> Result<CountdownOutcome>
where
    F: FnMut(&RunningTimer),
{
    cancel.arm();
    let outcome = count_down(timer, log, clock, pacer, cancel, notifier, on_tick);
    cancel.disarm();
    outcome
}

fn count_down<F>(
    timer: &mut Timer,
    log: &mut SessionLog,
    clock: &dyn Clock,
    pacer: &mut dyn Pacer,
    cancel: &CancelToken,
    notifier: &dyn Notifier,
    mut on_tick: F,
) -> Result<CountdownOutcome>
where
    F: FnMut(&RunningTimer),
{
    loop {
        match timer.running() {
            Some(running) => on_tick(running),
            None => return Err(PomodoroError::invalid("No timer is running")),
        }

        pacer.wait_second();
        if cancel.is_cancelled() {
            debug!("countdown cancelled");
            return Ok(CountdownOutcome::Cancelled);
        }

        if let Tick::Completed(completion) = timer.tick(log, clock.now())? {
            notifier.session_finished(completion.session.kind, completion.session.duration_minutes);
            return Ok(CountdownOutcome::Completed(completion));
        }
    }
}
