use crate::ids::{LevelId, TopicId, WordId};
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Grammatical article of a German noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Article {
    Der = 0,
    Die = 1,
    Das = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PartOfSpeech {
    Noun = 0,
    Verb = 1,
    Adjective = 2,
    Adverb = 3,
    Pronoun = 4,
    Article = 5,
    Preposition = 6,
    Conjunction = 7,
    Numeral = 8,
    Particle = 9,
}

/// A vocabulary entry. Optional fields absent in the REST payload are
/// normalized to empty collections by serde defaults, so `meanings` and
/// `sentences` are never null once a word is in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    /// Surface (singular) form.
    pub value: String,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub sentences: Vec<String>,
    #[serde(default)]
    pub article: Option<Article>,
    #[serde(default)]
    pub level: Option<LevelId>,
    #[serde(default)]
    pub topic: Option<TopicId>,
    #[serde(default)]
    pub pos: Option<PartOfSpeech>,
    #[serde(default)]
    pub synonyms: Vec<WordId>,
    #[serde(default)]
    pub antonyms: Vec<WordId>,
    /// "Words to watch": easily confused look-alikes.
    #[serde(default)]
    pub watch_words: Vec<WordId>,
}

impl Word {
    /// Words whose trimmed surface form is empty are invisible to every view.
    pub fn has_value(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// True when the word carries no topic and no usable meaning. Such words
    /// belong to the sentinel uncategorized bucket.
    pub fn is_unsorted(&self) -> bool {
        self.topic.is_none() && self.meanings.iter().all(|m| m.trim().is_empty())
    }
}

/// A proficiency tier. Read-only reference data from the cache's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: LevelId,
    pub label: String,
    /// One level is visibility-gated by role; gating happens in the caller.
    #[serde(default)]
    pub restricted: bool,
}

/// A subject grouping, optionally owned by a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    #[serde(default)]
    pub level: Option<LevelId>,
}

impl Topic {
    /// Sentinel catch-all bucket for words without classification. Fixed id,
    /// sorted last in every topic listing.
    pub const UNCATEGORIZED: TopicId = TopicId(0);

    pub fn is_uncategorized(&self) -> bool {
        self.id == Self::UNCATEGORIZED
    }
}

/// The durable unit: one full copy of the word list plus its reference data.
/// Replaced wholesale on every successful fetch, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub version: u32,
    pub words: Vec<Word>,
    pub levels: Vec<Level>,
    pub topics: Vec<Topic>,
    /// Unix milliseconds of the last successful full fetch.
    pub last_updated_ms: u64,
    /// A partial snapshot came from the size-bounded fast fetch and must
    /// trigger a background completion fetch.
    pub is_partial: bool,
}

impl CacheSnapshot {
    pub const SCHEMA_VERSION: u32 = 1;

    pub fn empty() -> Self {
        Self {
            version: Self::SCHEMA_VERSION,
            words: Vec::new(),
            levels: Vec::new(),
            topics: Vec::new(),
            last_updated_ms: 0,
            is_partial: false,
        }
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_updated_ms)
    }
}
