//! pomodoro - Pomodoro timer with a todo list and productivity statistics
//!
//! The pieces, leaves first:
//! - `task`: todo list persisted to `tasks.json`
//! - `store`: JSON persistence and the append-only session log
//! - `stats`: today/week/all-time totals, streak, best day, top tasks
//! - `timer`: work/break countdown state machine and the blocking loop
//! - `settings`: durations and long-break interval
//! - `app`: the menu-driven command loop over all of the above

pub mod app;
pub mod clock;
pub mod display;
pub mod error;
pub mod export;
pub mod menu;
pub mod notifier;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;
pub mod task;
pub mod timer;

pub use app::{App, Input, ScriptedInput, StdinInput};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{PomodoroError, Result};
pub use session::{Session, SessionKind};
pub use settings::{Settings, SettingsStore};
pub use stats::Statistics;
pub use store::SessionLog;
pub use task::{Priority, Task, TaskFilter, TaskStore};
pub use timer::{CancelToken, Timer, TimerState};
