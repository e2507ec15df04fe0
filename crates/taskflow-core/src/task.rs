use std::fmt;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(TaskId)
            .with_context(|| format!("invalid task id: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Priority::Low => "gray",
            Priority::Medium => "yellow",
            Priority::High => "red",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Priority::Low),
            "m" | "med" | "medium" => Ok(Priority::Medium),
            "h" | "high" => Ok(Priority::High),
            other => Err(anyhow!("invalid priority: {other} (expected low, medium or high)")),
        }
    }
}

/// A single unit of work.
///
/// Fields are read-only outside the crate: the completion flag is the only
/// state that changes after creation, and only `TaskStore` flips it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    uuid: Uuid,
    title: String,
    description: String,
    category: Category,
    priority: Priority,
    due: NaiveDate,
    completed: bool,
    created: NaiveDate,
}

impl Task {
    pub(crate) fn new(
        id: TaskId,
        title: String,
        description: String,
        category: Category,
        priority: Priority,
        due: NaiveDate,
        created: NaiveDate,
    ) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            title,
            description,
            category,
            priority,
            due,
            completed: false,
            created,
        }
    }

    pub(crate) fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub(crate) fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due(&self) -> NaiveDate {
        self.due
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created(&self) -> NaiveDate {
        self.created
    }

    /// Whole calendar days from `today` until the due date; negative once
    /// the due date has passed.
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due - today).num_days()
    }

    /// Incomplete and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due < today
    }

    /// Incomplete and due within `0..=window_days` days of `today`.
    pub fn is_upcoming(&self, today: NaiveDate, window_days: u32) -> bool {
        if self.completed {
            return false;
        }
        let diff = self.days_until_due(today);
        (0..=i64::from(window_days)).contains(&diff)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Priority, Task, TaskId};
    use crate::category::Category;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn task_due(due: NaiveDate) -> Task {
        Task::new(
            TaskId(1),
            "Write report".to_string(),
            String::new(),
            Category::Work,
            Priority::default(),
            due,
            day(2024, 1, 1),
        )
    }

    #[test]
    fn priority_orders_and_defaults() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!("H".parse::<Priority>().expect("short form"), Priority::High);
        assert_eq!("med".parse::<Priority>().expect("abbrev"), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn due_today_is_upcoming_not_overdue() {
        let today = day(2024, 1, 11);
        let task = task_due(today);
        assert_eq!(task.days_until_due(today), 0);
        assert!(!task.is_overdue(today));
        assert!(task.is_upcoming(today, 3));
    }

    #[test]
    fn upcoming_window_is_inclusive() {
        let today = day(2024, 1, 11);
        assert!(task_due(day(2024, 1, 14)).is_upcoming(today, 3));
        assert!(!task_due(day(2024, 1, 15)).is_upcoming(today, 3));
        assert!(!task_due(day(2024, 1, 10)).is_upcoming(today, 3));
        assert!(task_due(day(2024, 1, 10)).is_overdue(today));
    }

    #[test]
    fn completed_tasks_are_never_flagged() {
        let today = day(2024, 1, 11);
        let mut past = task_due(day(2024, 1, 1));
        past.toggle();
        assert!(!past.is_overdue(today));
        assert!(!past.is_upcoming(today, 3));
    }

    #[test]
    fn task_id_round_trips_through_text() {
        assert_eq!("42".parse::<TaskId>().expect("numeric id"), TaskId(42));
        assert_eq!(TaskId(7).to_string(), "7");
        assert!("abc".parse::<TaskId>().is_err());
    }

    #[test]
    fn serializes_dates_as_calendar_days() {
        let task = task_due(day(2024, 2, 1));
        let json = serde_json::to_value(&task).expect("serialize");
        assert_eq!(json["due"], "2024-02-01");
        assert_eq!(json["created"], "2024-01-01");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["category"], "work");
        assert_eq!(json["completed"], false);
        assert_eq!(json["id"], 1);
    }
}
