use crate::category::Category;
use crate::error::RequestError;
use serde::{Deserialize, Serialize};

/// One user action: a picked news category or a free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub category: Option<Category>,
    pub text: String,
}

impl QueryRequest {
    pub fn news(category: Category) -> Self {
        Self {
            category: Some(category),
            text: String::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            category: None,
            text: text.into(),
        }
    }

    /// Build a request from raw UI values, where `category` may be the
    /// `"None"` sentinel.
    pub fn parse(category: &str, text: &str) -> Result<Self, RequestError> {
        let category = if Category::is_none_sentinel(category) {
            None
        } else {
            Some(
                Category::from_str(category)
                    .ok_or_else(|| RequestError::UnknownCategory(category.trim().to_string()))?,
            )
        };

        Ok(Self {
            category,
            text: text.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.text.trim().is_empty()
    }

    /// Category and text are mutually exclusive; the category wins.
    pub fn normalized(&self) -> Self {
        match self.category {
            Some(category) => Self::news(category),
            None => self.clone(),
        }
    }

    /// How the request reads in the transcript.
    pub fn transcript_label(&self) -> String {
        match self.category {
            Some(category) => format!("News in {}", category),
            None => self.text.clone(),
        }
    }
}

/// Final text handed back to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
}

impl Response {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
