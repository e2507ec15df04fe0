use chrono::NaiveDate;
use serde::Serialize;

use crate::task::Task;
use crate::view::{ViewOptions, overdue_tasks, upcoming_tasks};

/// Deadline panel: incomplete tasks that are overdue or due soon.
///
/// Always computed over the whole collection, independent of the selected
/// category.
#[derive(Debug, Clone, Serialize)]
pub struct Notifications {
    pub overdue: Vec<Task>,
    pub upcoming: Vec<Task>,
    #[serde(skip)]
    preview_limit: usize,
}

impl Notifications {
    pub fn from_tasks(tasks: &[Task], today: NaiveDate, options: ViewOptions) -> Self {
        Self {
            overdue: overdue_tasks(tasks, today).into_iter().cloned().collect(),
            upcoming: upcoming_tasks(tasks, today, options.upcoming_days)
                .into_iter()
                .cloned()
                .collect(),
            preview_limit: options.preview_limit,
        }
    }

    /// The panel is hidden when there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.upcoming.is_empty()
    }

    pub fn overdue_headline(&self) -> Option<String> {
        match self.overdue.len() {
            0 => None,
            1 => Some("1 overdue task".to_string()),
            n => Some(format!("{n} overdue tasks")),
        }
    }

    pub fn upcoming_headline(&self) -> Option<String> {
        match self.upcoming.len() {
            0 => None,
            1 => Some("1 task due soon".to_string()),
            n => Some(format!("{n} tasks due soon")),
        }
    }

    pub fn overdue_preview(&self) -> &[Task] {
        &self.overdue[..self.overdue.len().min(self.preview_limit)]
    }

    pub fn upcoming_preview(&self) -> &[Task] {
        &self.upcoming[..self.upcoming.len().min(self.preview_limit)]
    }
}
