//! Derived views over the task
//! collection.
//!
//! Everything here is a pure function of
//! the current tasks, the selected
//! filter and the current date. Nothing
//! is cached, so callers recompute after
//! every mutation and never see stale
//! results.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::trace;

use crate::category::Category;
use crate::notify::Notifications;
use crate::task::Task;

/// Default width of the "due soon"
/// window, in days past today.
pub const DEFAULT_UPCOMING_DAYS: u32 =
  3;
/// Default number of tasks previewed
/// per notification group.
pub const DEFAULT_PREVIEW_LIMIT: usize =
  3;

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq,
)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(Category)
}

impl CategoryFilter {
  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | CategoryFilter::All => true,
      | CategoryFilter::Only(
        category
      ) => task.category() == category
    }
  }

  pub fn heading(self) -> String {
    match self {
      | CategoryFilter::All => {
        "All Tasks".to_string()
      }
      | CategoryFilter::Only(
        category
      ) => {
        format!(
          "{} Tasks",
          category.name()
        )
      }
    }
  }
}

impl fmt::Display for CategoryFilter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | CategoryFilter::All => {
        f.write_str("all")
      }
      | CategoryFilter::Only(
        category
      ) => write!(f, "{category}")
    }
  }
}

impl Serialize for CategoryFilter {
  fn serialize<S>(
    &self,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer
  {
    serializer.collect_str(self)
  }
}

impl FromStr for CategoryFilter {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    if s.trim().eq_ignore_ascii_case(
      "all"
    ) {
      return Ok(CategoryFilter::All);
    }
    s.parse::<Category>()
      .map(CategoryFilter::Only)
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ViewOptions {
  pub upcoming_days: u32,
  pub preview_limit: usize
}

impl Default for ViewOptions {
  fn default() -> Self {
    Self {
      upcoming_days:
        DEFAULT_UPCOMING_DAYS,
      preview_limit:
        DEFAULT_PREVIEW_LIMIT
    }
  }
}

pub fn filter_by_category(
  tasks: &[Task],
  filter: CategoryFilter
) -> Vec<&Task> {
  tasks
    .iter()
    .filter(|task| filter.matches(task))
    .collect()
}

pub fn active_tasks<'a>(
  tasks: impl IntoIterator<
    Item = &'a Task
  >
) -> Vec<&'a Task> {
  tasks
    .into_iter()
    .filter(|task| !task.is_completed())
    .collect()
}

/// Completed tasks across the whole
/// collection. The category filter is
/// not applied here; it only narrows
/// the active list.
pub fn completed_tasks(
  tasks: &[Task]
) -> Vec<&Task> {
  tasks
    .iter()
    .filter(|task| task.is_completed())
    .collect()
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
  Serialize,
)]
pub struct CategoryCount {
  pub category: Category,
  pub count:    usize
}

/// One entry per known category, in
/// table order, counting every task
/// regardless of completion.
pub fn category_counts(
  tasks: &[Task]
) -> Vec<CategoryCount> {
  Category::ALL
    .into_iter()
    .map(|category| CategoryCount {
      category,
      count: tasks
        .iter()
        .filter(|task| {
          task.category() == category
        })
        .count()
    })
    .collect()
}

pub fn overdue_tasks(
  tasks: &[Task],
  today: NaiveDate
) -> Vec<&Task> {
  tasks
    .iter()
    .filter(|task| {
      task.is_overdue(today)
    })
    .collect()
}

pub fn upcoming_tasks(
  tasks: &[Task],
  today: NaiveDate,
  window_days: u32
) -> Vec<&Task> {
  tasks
    .iter()
    .filter(|task| {
      task
        .is_upcoming(today, window_days)
    })
    .collect()
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct Summary {
  pub total:     usize,
  pub completed: usize,
  pub overdue:   usize,
  pub upcoming:  usize
}

impl Summary {
  pub fn compute(
    tasks: &[Task],
    today: NaiveDate,
    upcoming_days: u32
  ) -> Self {
    Self {
      total:     tasks.len(),
      completed: completed_tasks(tasks)
        .len(),
      overdue:   overdue_tasks(
        tasks, today
      )
      .len(),
      upcoming:  upcoming_tasks(
        tasks,
        today,
        upcoming_days
      )
      .len()
    }
  }
}

/// Everything a screen needs, computed
/// in one pass from a settled
/// collection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
  pub today:         NaiveDate,
  pub filter:        CategoryFilter,
  pub heading:       String,
  pub active:        Vec<Task>,
  pub completed:     Vec<Task>,
  pub categories:    Vec<CategoryCount>,
  pub summary:       Summary,
  pub notifications: Notifications
}

impl Dashboard {
  #[tracing::instrument(skip(
    tasks, options
  ))]
  pub fn build(
    tasks: &[Task],
    filter: CategoryFilter,
    today: NaiveDate,
    options: ViewOptions
  ) -> Self {
    let active = active_tasks(
      filter_by_category(tasks, filter)
    )
    .into_iter()
    .cloned()
    .collect::<Vec<_>>();
    let completed =
      completed_tasks(tasks)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    let notifications =
      Notifications::from_tasks(
        tasks, today, options
      );
    let summary = Summary::compute(
      tasks,
      today,
      options.upcoming_days
    );

    trace!(
      active = active.len(),
      completed = completed.len(),
      overdue = summary.overdue,
      upcoming = summary.upcoming,
      "built dashboard"
    );

    Self {
      today,
      filter,
      heading: filter.heading(),
      active,
      completed,
      categories: category_counts(
        tasks
      ),
      summary,
      notifications
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    CategoryFilter,
    Dashboard,
    Summary,
    ViewOptions,
    active_tasks,
    category_counts,
    completed_tasks,
    filter_by_category,
    overdue_tasks,
    upcoming_tasks
  };
  use crate::category::Category;
  use crate::task::{
    Priority,
    Task,
    TaskId
  };

  fn day(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  fn task(
    id: u64,
    category: Category,
    due: NaiveDate,
    completed: bool
  ) -> Task {
    Task::new(
      TaskId(id),
      format!("task {id}"),
      String::new(),
      category,
      Priority::Medium,
      due,
      day(2024, 1, 1)
    )
    .with_completed(completed)
  }

  fn ids(
    tasks: &[&Task]
  ) -> Vec<u64> {
    tasks
      .iter()
      .map(|task| task.id().0)
      .collect()
  }

  #[test]
  fn deadline_scenario() {
    let today = day(2024, 1, 11);
    let tasks = vec![
      task(
        1,
        Category::Work,
        day(2024, 1, 10),
        false
      ),
      task(
        2,
        Category::Work,
        day(2024, 1, 12),
        false
      ),
      task(
        3,
        Category::Work,
        day(2024, 1, 15),
        false
      ),
      task(
        4,
        Category::Work,
        day(2024, 1, 9),
        true
      ),
    ];

    assert_eq!(
      ids(&overdue_tasks(
        &tasks, today
      )),
      [1]
    );
    assert_eq!(
      ids(&upcoming_tasks(
        &tasks, today, 3
      )),
      [2]
    );
  }

  #[test]
  fn due_today_is_upcoming_only() {
    let today = day(2024, 1, 11);
    let tasks = vec![task(
      1,
      Category::Health,
      today,
      false
    )];
    assert!(
      overdue_tasks(&tasks, today)
        .is_empty()
    );
    assert_eq!(
      ids(&upcoming_tasks(
        &tasks, today, 3
      )),
      [1]
    );
  }

  #[test]
  fn filter_all_keeps_everything_in_order()
  {
    let today = day(2024, 1, 11);
    let tasks = vec![
      task(
        3,
        Category::Shopping,
        today,
        false
      ),
      task(1, Category::Work, today, true),
      task(
        2,
        Category::Shopping,
        today,
        false
      ),
    ];

    assert_eq!(
      ids(&filter_by_category(
        &tasks,
        CategoryFilter::All
      )),
      [3, 1, 2]
    );
    assert_eq!(
      ids(&filter_by_category(
        &tasks,
        CategoryFilter::Only(
          Category::Shopping
        )
      )),
      [3, 2]
    );
    assert!(
      filter_by_category(
        &tasks,
        CategoryFilter::Only(
          Category::Learning
        )
      )
      .is_empty()
    );
  }

  #[test]
  fn completed_list_ignores_category_filter()
  {
    let today = day(2024, 1, 11);
    let tasks = vec![
      task(1, Category::Work, today, true),
      task(
        2,
        Category::Personal,
        today,
        true
      ),
      task(
        3,
        Category::Personal,
        today,
        false
      ),
      task(
        4,
        Category::Work,
        today,
        false
      ),
    ];

    let dashboard = Dashboard::build(
      &tasks,
      CategoryFilter::Only(
        Category::Personal
      ),
      today,
      ViewOptions::default()
    );
    let active: Vec<u64> = dashboard
      .active
      .iter()
      .map(|t| t.id().0)
      .collect();
    let completed: Vec<u64> =
      dashboard
        .completed
        .iter()
        .map(|t| t.id().0)
        .collect();

    assert_eq!(active, [3]);
    assert_eq!(completed, [1, 2]);
    assert_eq!(
      dashboard.heading,
      "Personal Tasks"
    );
    assert_eq!(
      ids(&active_tasks(&tasks)),
      [3, 4]
    );
    assert_eq!(
      ids(&completed_tasks(&tasks)),
      [1, 2]
    );
  }

  #[test]
  fn counts_cover_every_category() {
    let today = day(2024, 1, 11);
    let tasks = vec![
      task(1, Category::Work, today, true),
      task(
        2,
        Category::Work,
        today,
        false
      ),
      task(
        3,
        Category::Learning,
        today,
        false
      ),
    ];

    let counts: Vec<(Category, usize)> =
      category_counts(&tasks)
        .into_iter()
        .map(|c| (c.category, c.count))
        .collect();
    assert_eq!(
      counts,
      [
        (Category::Work, 2),
        (Category::Personal, 0),
        (Category::Shopping, 0),
        (Category::Health, 0),
        (Category::Learning, 1)
      ]
    );
  }

  #[test]
  fn empty_collection_yields_empty_views() {
    let today = day(2024, 1, 11);
    let tasks: Vec<Task> = Vec::new();

    assert!(
      filter_by_category(
        &tasks,
        CategoryFilter::All
      )
      .is_empty()
    );
    assert!(
      overdue_tasks(&tasks, today)
        .is_empty()
    );
    assert_eq!(
      Summary::compute(&tasks, today, 3),
      Summary::default()
    );
    assert!(
      category_counts(&tasks)
        .iter()
        .all(|c| c.count == 0)
    );
    let dashboard = Dashboard::build(
      &tasks,
      CategoryFilter::All,
      today,
      ViewOptions::default()
    );
    assert!(
      dashboard.notifications.is_empty()
    );
  }

  #[test]
  fn summary_counts_match_views() {
    let today = day(2024, 1, 11);
    let tasks = vec![
      task(
        1,
        Category::Work,
        day(2024, 1, 10),
        false
      ),
      task(
        2,
        Category::Work,
        day(2024, 1, 11),
        false
      ),
      task(
        3,
        Category::Health,
        day(2024, 1, 9),
        true
      ),
    ];

    assert_eq!(
      Summary::compute(&tasks, today, 3),
      Summary {
        total:     3,
        completed: 1,
        overdue:   1,
        upcoming:  1
      }
    );
  }

  #[test]
  fn filter_parses_all_and_ids() {
    assert_eq!(
      "ALL"
        .parse::<CategoryFilter>()
        .expect("all"),
      CategoryFilter::All
    );
    assert_eq!(
      "learning"
        .parse::<CategoryFilter>()
        .expect("learning"),
      CategoryFilter::Only(
        Category::Learning
      )
    );
    assert!(
      "errands"
        .parse::<CategoryFilter>()
        .is_err()
    );
    assert_eq!(
      CategoryFilter::All.heading(),
      "All Tasks"
    );
    assert_eq!(
      CategoryFilter::Only(
        Category::Work
      )
      .to_string(),
      "work"
    );
  }
}
