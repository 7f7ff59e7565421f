//! pomodoro-notify - Desktop notifications for pomodoro session events
//!
//! Uses notify-send on Linux desktops and osascript on macOS, and falls
//! back to a plain line on the terminal. Every notification rings the
//! terminal bell.

mod backend;

pub use backend::{Backend, Notification, Urgency};

use anyhow::Result;

/// Default notification title
pub const DEFAULT_TITLE: &str = "Pomodoro";

/// Send a notification with the detected backend
pub fn send(notification: &Notification) -> Result<()> {
    let backend = Backend::detect();
    tracing::debug!(backend = backend.name(), title = %notification.title, "sending notification");
    backend.send(notification)
}
