//! Productivity statistics
//!
//! Pure aggregation over the session log. Only completed work sessions
//! count towards the productivity figures; interrupted ones appear only in
//! the completion rate. Weeks start on Monday.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::clock::Clock;
use crate::session::{Session, SessionKind};

/// Count and total length of a group of work sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sessions: u32,
    pub minutes: u32,
}

/// Work sessions attributed to one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskTally {
    pub task_id: u64,
    pub sessions: u32,
    pub minutes: u32,
}

/// Every figure the statistics screen shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub today: Summary,
    pub this_week: Summary,
    pub all_time: Summary,
    pub streak: u32,
    pub best_day: Option<(NaiveDate, u32)>,
    pub top_tasks: Vec<TaskTally>,
    pub completion_rate: u32,
    pub week_chart: Vec<(Weekday, u32)>,
}

/// Statistics over a session history as seen from one calendar day
pub struct Statistics<'a> {
    sessions: &'a [Session],
    today: NaiveDate,
}

impl<'a> Statistics<'a> {
    pub fn new(sessions: &'a [Session], today: NaiveDate) -> Self {
        Self { sessions, today }
    }

    /// Use the clock's local date as "today"
    pub fn at(sessions: &'a [Session], clock: &dyn Clock) -> Self {
        Self::new(sessions, clock.now().date_naive())
    }

    fn productive(&self) -> impl Iterator<Item = &'a Session> {
        self.sessions.iter().filter(|s| s.is_productive())
    }

    fn summarize<'s>(sessions: impl Iterator<Item = &'s Session>) -> Summary {
        sessions.fold(Summary::default(), |acc, s| Summary {
            sessions: acc.sessions.saturating_add(1),
            minutes: acc.minutes.saturating_add(s.duration_minutes),
        })
    }

    /// Monday of the current week
    pub fn week_start(&self) -> NaiveDate {
        self.today - Duration::days(self.today.weekday().num_days_from_monday() as i64)
    }

    /// Work completed on today's calendar date
    pub fn today(&self) -> Summary {
        Self::summarize(self.productive().filter(|s| s.date() == self.today))
    }

    /// Work completed Monday through Sunday of the current week
    pub fn this_week(&self) -> Summary {
        let start = self.week_start();
        let end = start + Duration::days(6);
        Self::summarize(self.productive().filter(|s| (start..=end).contains(&s.date())))
    }

    pub fn all_time(&self) -> Summary {
        Self::summarize(self.productive())
    }

    /// Consecutive days with work, counted back from today or yesterday
    pub fn streak(&self) -> u32 {
        let days: BTreeSet<NaiveDate> = self.productive().map(|s| s.date()).collect();
        let yesterday = self.today - Duration::days(1);

        let mut day = if days.contains(&self.today) {
            self.today
        } else if days.contains(&yesterday) {
            yesterday
        } else {
            return 0;
        };

        let mut streak = 0;
        while days.contains(&day) {
            streak += 1;
            day -= Duration::days(1);
        }
        streak
    }

    /// Day with the most work sessions; the earliest wins a tie
    pub fn best_day(&self) -> Option<(NaiveDate, u32)> {
        let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for session in self.productive() {
            *per_day.entry(session.date()).or_default() += 1;
        }

        let mut best: Option<(NaiveDate, u32)> = None;
        for (date, count) in per_day {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((date, count));
            }
        }
        best
    }

    /// Tasks with the most work sessions, ties broken by lower id
    pub fn top_tasks(&self, n: usize) -> Vec<TaskTally> {
        let mut per_task: HashMap<u64, TaskTally> = HashMap::new();
        for session in self.productive() {
            let Some(task_id) = session.task_id else {
                continue;
            };
            let tally = per_task.entry(task_id).or_insert(TaskTally {
                task_id,
                sessions: 0,
                minutes: 0,
            });
            tally.sessions = tally.sessions.saturating_add(1);
            tally.minutes = tally.minutes.saturating_add(session.duration_minutes);
        }

        let mut tallies: Vec<TaskTally> = per_task.into_values().collect();
        tallies.sort_by(|a, b| b.sessions.cmp(&a.sessions).then(a.task_id.cmp(&b.task_id)));
        tallies.truncate(n);
        tallies
    }

    /// Share of started work sessions that ran to completion, 0-100
    pub fn completion_rate(&self) -> u32 {
        let work: Vec<&Session> = self
            .sessions
            .iter()
            .filter(|s| s.kind == SessionKind::Work)
            .collect();
        if work.is_empty() {
            return 0;
        }
        let completed = work.iter().filter(|s| !s.was_interrupted).count();
        ((completed * 100) / work.len()) as u32
    }

    /// Work sessions per weekday of the current week, Monday first
    pub fn week_chart(&self) -> Vec<(Weekday, u32)> {
        let start = self.week_start();
        (0..7)
            .map(|offset| {
                let day = start + Duration::days(offset);
                let count = self.productive().filter(|s| s.date() == day).count() as u32;
                (day.weekday(), count)
            })
            .collect()
    }

    pub fn report(&self, top_n: usize) -> Report {
        Report {
            today: self.today(),
            this_week: self.this_week(),
            all_time: self.all_time(),
            streak: self.streak(),
            best_day: self.best_day(),
            top_tasks: self.top_tasks(top_n),
            completion_rate: self.completion_rate(),
            week_chart: self.week_chart(),
        }
    }
}
