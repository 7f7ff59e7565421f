//! Formatting utilities

use chrono::{DateTime, Local};

/// Format a countdown as MM:SS (minutes keep growing past 59)
pub fn clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a minute total as "1h 5m" or "45m"
pub fn minutes(total: u32) -> String {
    let hours = total / 60;
    let mins = total % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a timestamp as HH:MM:SS
pub fn time(dt: DateTime<Local>) -> String {
    dt.format("%H:%M:%S").to_string()
}

/// Truncate a string to max characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Render a horizontal bar of `width` cells scaled against `max`
pub fn bar(value: u32, max: u32, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = (width * value as usize) / max as usize;
    "\u{2588}".repeat(filled.min(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(65), "01:05");
        assert_eq!(clock(25 * 60), "25:00");
        assert_eq!(clock(100 * 60 + 1), "100:01");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(minutes(0), "0m");
        assert_eq!(minutes(45), "45m");
        assert_eq!(minutes(125), "2h 5m");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer task name", 10), "a longe...");
        assert_eq!(truncate("abcdef", 2), "...");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0, 0, 20), "");
        assert_eq!(bar(5, 10, 20).chars().count(), 10);
        assert_eq!(bar(10, 10, 20).chars().count(), 20);
    }
}
