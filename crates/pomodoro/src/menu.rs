//! Typed menu commands
//!
//! Each menu is an enum; the number typed at the prompt is the 1-based
//! position in `entries()`. Input parsing never touches the stores.

use crate::settings::SettingField;

/// A numbered menu
pub trait Menu: Sized + Copy + 'static {
    const TITLE: &'static str;

    fn entries() -> &'static [Self];

    fn label(&self) -> String;

    /// Parse a 1-based menu number
    fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        Self::entries().get(n.checked_sub(1)?).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    StartTimer,
    ManageTasks,
    ViewStatistics,
    Settings,
    Exit,
}

impl Menu for MainCommand {
    const TITLE: &'static str = "MAIN MENU";

    fn entries() -> &'static [Self] {
        &[
            MainCommand::StartTimer,
            MainCommand::ManageTasks,
            MainCommand::ViewStatistics,
            MainCommand::Settings,
            MainCommand::Exit,
        ]
    }

    fn label(&self) -> String {
        match self {
            MainCommand::StartTimer => "Start Pomodoro Timer",
            MainCommand::ManageTasks => "Manage Tasks",
            MainCommand::ViewStatistics => "View Statistics",
            MainCommand::Settings => "Settings",
            MainCommand::Exit => "Exit",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCommand {
    List,
    Add,
    Complete,
    Uncomplete,
    Delete,
    Rename,
    SetPriority,
    Search,
    SortByPriority,
    ClearCompleted,
    Export,
    Back,
}

impl Menu for TaskCommand {
    const TITLE: &'static str = "TASK MANAGEMENT";

    fn entries() -> &'static [Self] {
        &[
            TaskCommand::List,
            TaskCommand::Add,
            TaskCommand::Complete,
            TaskCommand::Uncomplete,
            TaskCommand::Delete,
            TaskCommand::Rename,
            TaskCommand::SetPriority,
            TaskCommand::Search,
            TaskCommand::SortByPriority,
            TaskCommand::ClearCompleted,
            TaskCommand::Export,
            TaskCommand::Back,
        ]
    }

    fn label(&self) -> String {
        match self {
            TaskCommand::List => "View All Tasks",
            TaskCommand::Add => "Add New Task",
            TaskCommand::Complete => "Complete Task",
            TaskCommand::Uncomplete => "Reopen Task",
            TaskCommand::Delete => "Delete Task",
            TaskCommand::Rename => "Rename Task",
            TaskCommand::SetPriority => "Set Priority",
            TaskCommand::Search => "Search Tasks",
            TaskCommand::SortByPriority => "Sort by Priority",
            TaskCommand::ClearCompleted => "Clear Completed Tasks",
            TaskCommand::Export => "Export Tasks",
            TaskCommand::Back => "Back to Main Menu",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsCommand {
    Report,
    Export,
    Clear,
    Back,
}

impl Menu for StatsCommand {
    const TITLE: &'static str = "STATISTICS";

    fn entries() -> &'static [Self] {
        &[
            StatsCommand::Report,
            StatsCommand::Export,
            StatsCommand::Clear,
            StatsCommand::Back,
        ]
    }

    fn label(&self) -> String {
        match self {
            StatsCommand::Report => "Show Statistics",
            StatsCommand::Export => "Export Statistics",
            StatsCommand::Clear => "Clear Session History",
            StatsCommand::Back => "Back to Main Menu",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsCommand {
    Edit(SettingField),
    ToggleNotifications,
    Reset,
    Back,
}

impl Menu for SettingsCommand {
    const TITLE: &'static str = "SETTINGS";

    fn entries() -> &'static [Self] {
        &[
            SettingsCommand::Edit(SettingField::PomodoroMinutes),
            SettingsCommand::Edit(SettingField::ShortBreakMinutes),
            SettingsCommand::Edit(SettingField::LongBreakMinutes),
            SettingsCommand::Edit(SettingField::LongBreakInterval),
            SettingsCommand::ToggleNotifications,
            SettingsCommand::Reset,
            SettingsCommand::Back,
        ]
    }

    fn label(&self) -> String {
        match self {
            SettingsCommand::Edit(field) => field.label().to_string(),
            SettingsCommand::ToggleNotifications => "Toggle Notifications".to_string(),
            SettingsCommand::Reset => "Reset to Default".to_string(),
            SettingsCommand::Back => "Back to Main Menu".to_string(),
        }
    }
}

/// Parse a yes/no answer; anything but "y"/"yes" is no
pub fn confirmed(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_one_based() {
        assert_eq!(MainCommand::parse("1"), Some(MainCommand::StartTimer));
        assert_eq!(MainCommand::parse(" 5 "), Some(MainCommand::Exit));
        assert_eq!(MainCommand::parse("0"), None);
        assert_eq!(MainCommand::parse("6"), None);
        assert_eq!(MainCommand::parse("start"), None);
        assert_eq!(MainCommand::parse(""), None);
    }

    #[test]
    fn test_every_menu_ends_with_a_way_out() {
        assert_eq!(TaskCommand::entries().last(), Some(&TaskCommand::Back));
        assert_eq!(StatsCommand::entries().last(), Some(&StatsCommand::Back));
        assert_eq!(SettingsCommand::entries().last(), Some(&SettingsCommand::Back));
        assert_eq!(MainCommand::entries().last(), Some(&MainCommand::Exit));
    }

    #[test]
    fn test_settings_entries_edit_fields() {
        assert_eq!(
            SettingsCommand::parse("1"),
            Some(SettingsCommand::Edit(SettingField::PomodoroMinutes))
        );
        assert_eq!(SettingsCommand::parse("6"), Some(SettingsCommand::Reset));
    }

    #[test]
    fn test_confirmed() {
        assert!(confirmed("y"));
        assert!(confirmed(" YES "));
        assert!(!confirmed("n"));
        assert!(!confirmed(""));
    }
}
