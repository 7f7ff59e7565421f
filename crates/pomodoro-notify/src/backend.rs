//! Notification backends for different platforms

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::Command;

/// Notification urgency levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Urgency {
    #[default]
    Normal,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        }
    }
}

/// A notification to display
#[derive(Debug, Clone, Default)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub urgency: Urgency,
}

impl Notification {
    /// Create a new notification with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: crate::DEFAULT_TITLE.to_string(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    fn notify_send_args(&self) -> Vec<String> {
        vec![
            "--app-name".to_string(),
            crate::DEFAULT_TITLE.to_string(),
            "--urgency".to_string(),
            self.urgency.as_str().to_string(),
            self.title.clone(),
            self.message.clone(),
        ]
    }

    fn applescript(&self) -> String {
        format!(
            r#"display notification "{}" with title "{}" sound name "default""#,
            osascript_escape(&self.message),
            osascript_escape(&self.title)
        )
    }
}

/// Available notification backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Linux/BSD desktops via libnotify
    NotifySend,
    /// macOS Notification Center
    Osascript,
    /// A line on the terminal
    Terminal,
}

impl Backend {
    /// Detect the best backend for the current platform
    pub fn detect() -> Self {
        Self::pick(cfg!(target_os = "macos"), on_path)
    }

    fn pick(macos: bool, available: impl Fn(&str) -> bool) -> Self {
        if macos && available("osascript") {
            Self::Osascript
        } else if !macos && available("notify-send") {
            Self::NotifySend
        } else {
            Self::Terminal
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NotifySend => "notify-send",
            Self::Osascript => "osascript",
            Self::Terminal => "terminal",
        }
    }

    /// Show the notification. The terminal bell rings either way.
    pub fn send(&self, notification: &Notification) -> Result<()> {
        let result = match self {
            Self::NotifySend => run("notify-send", &notification.notify_send_args()),
            Self::Osascript => run("osascript", &["-e".to_string(), notification.applescript()]),
            Self::Terminal => {
                println!("[{}] {}", notification.title, notification.message);
                Ok(())
            }
        };
        bell();
        result
    }
}

fn run(program: &str, args: &[String]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to run {}", program))?;
    if !status.success() {
        bail!("{} failed with status: {}", program, status);
    }
    Ok(())
}

fn on_path(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn osascript_escape(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}

fn bell() {
    print!("\x07");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_builder() {
        let n = Notification::new("Break over")
            .with_title("Back to work")
            .with_urgency(Urgency::Critical);

        assert_eq!(n.title, "Back to work");
        assert_eq!(n.message, "Break over");
        assert_eq!(n.urgency, Urgency::Critical);
    }

    #[test]
    fn test_default_title() {
        let n = Notification::new("Time to focus");
        assert_eq!(n.title, crate::DEFAULT_TITLE);
        assert_eq!(n.urgency, Urgency::Normal);
    }

    #[test]
    fn test_notify_send_args() {
        let args = Notification::new("25 minutes done")
            .with_urgency(Urgency::Critical)
            .notify_send_args();
        assert_eq!(
            args,
            vec!["--app-name", "Pomodoro", "--urgency", "critical", "Pomodoro", "25 minutes done"]
        );
    }

    #[test]
    fn test_applescript_escapes_quotes() {
        let script = Notification::new(r#"say "hi""#).applescript();
        assert!(script.starts_with(r#"display notification "say \"hi\"""#));
        assert_eq!(osascript_escape(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_pick_backend() {
        assert_eq!(Backend::pick(true, |_| true), Backend::Osascript);
        assert_eq!(Backend::pick(false, |cmd| cmd == "notify-send"), Backend::NotifySend);
        assert_eq!(Backend::pick(false, |_| false), Backend::Terminal);
        assert_eq!(Backend::pick(true, |_| false), Backend::Terminal);
        assert_eq!(Backend::Terminal.name(), "terminal");
    }
}
