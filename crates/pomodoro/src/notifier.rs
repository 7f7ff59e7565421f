//! Desktop notifications when a countdown runs out

use pomodoro_notify::{Notification, Urgency};
use tracing::warn;

use crate::session::SessionKind;
use crate::timer::Notifier;

/// Sends a desktop notification through the platform backend
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn message(kind: SessionKind, duration_minutes: u32) -> Notification {
        match kind {
            SessionKind::Work => Notification::new(format!(
                "{} minutes of focus done. Time for a break!",
                duration_minutes
            ))
            .with_title("Pomodoro Complete!")
            .with_urgency(Urgency::Critical),
            SessionKind::ShortBreak | SessionKind::LongBreak => {
                Notification::new("Ready for another pomodoro?").with_title("Break Over!")
            }
        }
    }
}

impl Notifier for DesktopNotifier {
    fn session_finished(&self, kind: SessionKind, duration_minutes: u32) {
        let notification = Self::message(kind, duration_minutes);
        if let Err(e) = pomodoro_notify::send(&notification) {
            warn!(error = %e, "desktop notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_by_kind() {
        let work = DesktopNotifier::message(SessionKind::Work, 25);
        assert_eq!(work.title, "Pomodoro Complete!");
        assert!(work.message.contains("25 minutes"));
        assert_eq!(work.urgency, Urgency::Critical);

        let rest = DesktopNotifier::message(SessionKind::LongBreak, 15);
        assert_eq!(rest.title, "Break Over!");
        assert_eq!(rest.urgency, Urgency::Normal);
    }
}
