//! Demo tasks for a fresh session started with `--seed`.

use chrono::NaiveDate;

use crate::category::Category;
use crate::store::TaskStore;
use crate::task::{Priority, Task, TaskId};

struct SampleTask {
    id: u64,
    title: &'static str,
    description: &'static str,
    category: Category,
    priority: Priority,
    due: (i32, u32, u32),
    created: (i32, u32, u32),
    completed: bool,
}

const SAMPLES: [SampleTask; 3] = [
    SampleTask {
        id: 1,
        title: "Complete project proposal",
        description: "Finish the Q1 project proposal for the marketing campaign",
        category: Category::Work,
        priority: Priority::High,
        due: (2024, 1, 15),
        created: (2024, 1, 10),
        completed: false,
    },
    SampleTask {
        id: 2,
        title: "Buy groceries",
        description: "Weekly grocery shopping - milk, bread, fruits",
        category: Category::Shopping,
        priority: Priority::Medium,
        due: (2024, 1, 12),
        created: (2024, 1, 10),
        completed: false,
    },
    SampleTask {
        id: 3,
        title: "Morning workout",
        description: "30 minutes cardio and strength training",
        category: Category::Health,
        priority: Priority::Medium,
        due: (2024, 1, 11),
        created: (2024, 1, 9),
        completed: true,
    },
];

pub fn sample_tasks() -> Vec<Task> {
    SAMPLES
        .iter()
        .filter_map(|sample| {
            let due = NaiveDate::from_ymd_opt(sample.due.0, sample.due.1, sample.due.2)?;
            let created =
                NaiveDate::from_ymd_opt(sample.created.0, sample.created.1, sample.created.2)?;
            Some(
                Task::new(
                    TaskId(sample.id),
                    sample.title.to_string(),
                    sample.description.to_string(),
                    sample.category,
                    sample.priority,
                    due,
                    created,
                )
                .with_completed(sample.completed),
            )
        })
        .collect()
}

pub fn seeded_store() -> TaskStore {
    TaskStore::with_tasks(sample_tasks())
}

#[cfg(test)]
mod tests {
    use super::seeded_store;
    use crate::task::TaskId;

    #[test]
    fn seeds_three_tasks_with_one_completed() {
        let store = seeded_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.tasks().iter().filter(|t| t.is_completed()).count(), 1);
        assert_eq!(
            store.get(TaskId(3)).map(|t| t.title()),
            Some("Morning workout")
        );
    }
}
