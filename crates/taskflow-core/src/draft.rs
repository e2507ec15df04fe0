//! Unvalidated task input.
//!
//! A [`TaskDraft`] carries whatever the presentation layer collected. It only
//! becomes a task through [`TaskDraft::validate`], which either yields every
//! required field or names the first one that is missing or malformed.

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::category::Category;
use crate::datetime::parse_due_date;
use crate::task::Priority;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    /// Checks required fields and resolves category, priority and due date.
    ///
    /// `today` anchors relative due dates such as `tomorrow` or `+3d`.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidDraft, DraftError> {
        let title = non_empty(self.title.as_deref()).ok_or(DraftError::MissingTitle)?;

        let raw_category =
            non_empty(self.category.as_deref()).ok_or(DraftError::MissingCategory)?;
        let category = Category::from_id(raw_category)
            .ok_or_else(|| DraftError::UnknownCategory(raw_category.to_string()))?;

        let raw_due = non_empty(self.due.as_deref()).ok_or(DraftError::MissingDueDate)?;
        let due = parse_due_date(raw_due, today)
            .map_err(|_| DraftError::InvalidDueDate(raw_due.to_string()))?;

        let priority = match non_empty(self.priority.as_deref()) {
            None => Priority::default(),
            Some(raw) => raw
                .parse::<Priority>()
                .map_err(|_| DraftError::InvalidPriority(raw.to_string()))?,
        };

        Ok(ValidDraft {
            title: title.to_string(),
            description: self.description.clone().unwrap_or_default(),
            category,
            priority,
            due,
        })
    }
}

/// Draft whose required fields are all present and resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub due: NaiveDate,
}

/// Why a draft was declined. No task is created when any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    MissingTitle,
    MissingCategory,
    UnknownCategory(String),
    MissingDueDate,
    InvalidDueDate(String),
    InvalidPriority(String),
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "task title is required"),
            Self::MissingCategory => write!(f, "task category is required"),
            Self::UnknownCategory(raw) => write!(f, "unknown category: {raw}"),
            Self::MissingDueDate => write!(f, "task due date is required"),
            Self::InvalidDueDate(raw) => write!(f, "unrecognized due date: {raw}"),
            Self::InvalidPriority(raw) => {
                write!(f, "invalid priority: {raw} (expected low, medium or high)")
            }
        }
    }
}

impl Error for DraftError {}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DraftError, TaskDraft};
    use crate::category::Category;
    use crate::task::Priority;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 11).expect("valid date")
    }

    #[test]
    fn fills_defaults_for_optional_fields() {
        let valid = TaskDraft::new("Test")
            .category("work")
            .due("2024-02-01")
            .validate(today())
            .expect("valid draft");

        assert_eq!(valid.title, "Test");
        assert_eq!(valid.description, "");
        assert_eq!(valid.category, Category::Work);
        assert_eq!(valid.priority, Priority::Medium);
        assert_eq!(valid.due, NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"));
    }

    #[test]
    fn rejects_missing_required_fields_in_order() {
        assert_eq!(
            TaskDraft::default().validate(today()),
            Err(DraftError::MissingTitle)
        );
        assert_eq!(
            TaskDraft::new("   ").category("work").due("today").validate(today()),
            Err(DraftError::MissingTitle)
        );
        assert_eq!(
            TaskDraft::new("Test").due("today").validate(today()),
            Err(DraftError::MissingCategory)
        );
        assert_eq!(
            TaskDraft::new("Test").category("work").due("").validate(today()),
            Err(DraftError::MissingDueDate)
        );
    }

    #[test]
    fn rejects_values_outside_the_fixed_tables() {
        assert_eq!(
            TaskDraft::new("Test").category("errands").due("today").validate(today()),
            Err(DraftError::UnknownCategory("errands".to_string()))
        );
        assert_eq!(
            TaskDraft::new("Test")
                .category("work")
                .due("today")
                .priority("urgent")
                .validate(today()),
            Err(DraftError::InvalidPriority("urgent".to_string()))
        );
        assert_eq!(
            TaskDraft::new("Test").category("work").due("someday").validate(today()),
            Err(DraftError::InvalidDueDate("someday".to_string()))
        );
    }

    #[test]
    fn blank_priority_falls_back_to_medium() {
        let valid = TaskDraft::new("Test")
            .category("health")
            .due("tomorrow")
            .priority("  ")
            .validate(today())
            .expect("valid draft");
        assert_eq!(valid.priority, Priority::Medium);
    }

    #[test]
    fn out_of_range_offsets_are_declined() {
        for due in ["+999999999999999d", "+99999999999999w"] {
            assert_eq!(
                TaskDraft::new("x").category("work").due(due).validate(today()),
                Err(DraftError::InvalidDueDate(due.to_string()))
            );
        }
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(DraftError::MissingTitle.to_string(), "task title is required");
        assert_eq!(
            DraftError::UnknownCategory("x".to_string()).to_string(),
            "unknown category: x"
        );
    }
}
