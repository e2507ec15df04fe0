//! Fixed category table.
//!
//! Categories are static reference data. They are never created, renamed or
//! removed at runtime, so the table is an enum and every `Task` holding a
//! `Category` references a valid entry by construction.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Health,
    Learning,
}

impl Category {
    /// Every category in sidebar display order.
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Health,
        Category::Learning,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Learning => "learning",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Learning => "Learning",
        }
    }

    /// Color tag a renderer can map onto its own palette.
    pub fn color(self) -> &'static str {
        match self {
            Category::Work => "blue",
            Category::Personal => "green",
            Category::Shopping => "purple",
            Category::Health => "red",
            Category::Learning => "orange",
        }
    }

    pub fn from_id(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.id().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| {
            let known = Self::ALL.map(Category::id).join(", ");
            anyhow!("unknown category: {s} (expected one of: {known})")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn ids_resolve_case_insensitively() {
        assert_eq!(Category::from_id("Work"), Some(Category::Work));
        assert_eq!(Category::from_id("  shopping "), Some(Category::Shopping));
        assert_eq!(Category::from_id("errands"), None);
        assert_eq!(Category::from_id(""), None);
    }

    #[test]
    fn table_is_complete_and_ordered() {
        let ids: Vec<&str> = Category::ALL.iter().map(|c| c.id()).collect();
        assert_eq!(ids, ["work", "personal", "shopping", "health", "learning"]);
        assert_eq!(Category::Learning.name(), "Learning");
        assert_eq!(Category::Health.color(), "red");
    }

    #[test]
    fn parse_error_lists_known_ids() {
        let err = "errands".parse::<Category>().expect_err("unknown id");
        assert!(err.to_string().contains("work, personal"));
    }

    #[test]
    fn serializes_as_lowercase_id() {
        let json = serde_json::to_string(&Category::Personal).expect("serialize");
        assert_eq!(json, "\"personal\"");
    }
}
