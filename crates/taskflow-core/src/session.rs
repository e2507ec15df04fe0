use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::Config;
use crate::datetime::{Clock, resolve_timezone};
use crate::draft::{DraftError, TaskDraft};
use crate::seed::seeded_store;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use crate::view::{CategoryFilter, Dashboard, ViewOptions};

/// One interactive session: the task store plus the view-layer state
/// (selected category, display options) that lives outside it. "Today"
/// always comes from the store's clock.
#[derive(Debug, Clone)]
pub struct Session {
    store: TaskStore,
    filter: CategoryFilter,
    options: ViewOptions,
}

impl Session {
    pub fn new(store: TaskStore, options: ViewOptions) -> Self {
        Self {
            store,
            filter: CategoryFilter::All,
            options,
        }
    }

    #[tracing::instrument(skip(cfg))]
    pub fn from_config(cfg: &Config, fixed_today: Option<NaiveDate>) -> anyhow::Result<Self> {
        let clock = Clock::new(resolve_timezone(cfg.timezone.as_deref())).with_fixed_today(fixed_today);
        let store = if cfg.seed {
            seeded_store()
        } else {
            TaskStore::new()
        };
        let mut session = Self::new(store.with_clock(clock), cfg.view_options());
        session.filter = cfg.default_filter()?;

        info!(
            seeded = cfg.seed,
            tasks = session.store.len(),
            filter = %session.filter,
            timezone = %session.store.clock().timezone_label(),
            today = %session.today(),
            "session ready"
        );
        Ok(session)
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        debug!(from = %self.filter, to = %filter, "filter changed");
        self.filter = filter;
    }

    pub fn today(&self) -> NaiveDate {
        self.store.today()
    }

    pub fn options(&self) -> ViewOptions {
        self.options
    }

    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<Task, DraftError> {
        self.store.add_task(draft).cloned()
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Option<bool> {
        self.store.toggle_complete(id)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        self.store.delete_task(id)
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(self.store.tasks(), self.filter, self.today(), self.options)
    }
}
