use serde::{Deserialize, Serialize};

/// Which word field the free-text search runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Word,
    Meaning,
}

/// Ephemeral view state driving the pipeline. Recreated from UI state each
/// render; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Selected level label, e.g. "A1".
    #[serde(default)]
    pub level: Option<String>,
    /// Selected topic name.
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub mode: SearchMode,
    /// 1-based page number.
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            level: None,
            topic: None,
            search: String::new(),
            mode: SearchMode::Word,
            page: 1,
        }
    }
}

impl FilterCriteria {
    /// Topic choices are level-scoped, so changing the level clears the
    /// selected topic and returns to page 1.
    pub fn select_level(&mut self, level: Option<String>) {
        self.level = level;
        self.topic = None;
        self.page = 1;
    }

    pub fn select_topic(&mut self, topic: Option<String>) {
        self.topic = topic;
        self.page = 1;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.page = 1;
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// The effective needle: trimmed, lowercased, `None` when blank.
    pub fn needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }
}
