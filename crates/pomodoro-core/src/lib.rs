//! pomodoro-core - Shared functionality for the pomodoro tools
//!
//! Standard file locations and the small formatting helpers used by
//! both the timer and its statistics screens.

pub mod format;
pub mod paths;

pub use paths::Paths;
