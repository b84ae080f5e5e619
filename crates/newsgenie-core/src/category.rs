use serde::{Deserialize, Serialize};

/// A news topic understood by the headlines endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Technology,
    Sports,
    Finance,
    Health,
    Entertainment,
    Science,
    World,
    Politics,
}

/// Label the UI shows for "no category selected".
pub const NO_CATEGORY: &str = "None";

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Finance => "finance",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
            Category::Science => "science",
            Category::World => "world",
            Category::Politics => "politics",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "business" => Some(Category::Business),
            "technology" => Some(Category::Technology),
            "sports" => Some(Category::Sports),
            "finance" => Some(Category::Finance),
            "health" => Some(Category::Health),
            "entertainment" => Some(Category::Entertainment),
            "science" => Some(Category::Science),
            "world" => Some(Category::World),
            "politics" => Some(Category::Politics),
            _ => None,
        }
    }

    /// True for the values that mean "no category": empty or `none`.
    pub fn is_none_sentinel(s: &str) -> bool {
        let s = s.trim();
        s.is_empty() || s.eq_ignore_ascii_case(NO_CATEGORY)
    }

    pub fn all() -> Vec<Category> {
        vec![
            Category::Business,
            Category::Technology,
            Category::Sports,
            Category::Finance,
            Category::Health,
            Category::Entertainment,
            Category::Science,
            Category::World,
            Category::Politics,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Finance => "Finance",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Science => "Science",
            Category::World => "World",
            Category::Politics => "Politics",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
