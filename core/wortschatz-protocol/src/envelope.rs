//! Response envelopes for the consumed REST surface.
//!
//! The backend nests payloads inconsistently (`.data.data` here, `.data`
//! there). Each endpoint gets exactly one explicit envelope type and is
//! normalized at this boundary; no shape-sniffing leaks past this module.

use crate::ids::WordId;
use crate::model::{CacheSnapshot, Level, Topic, Word};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Envelope of `GET /word/all` (both the `all=true` full fetch and the
/// `limit=N&page=1` fast fetch share this shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordListEnvelope {
    pub data: WordListData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordListData {
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl WordListEnvelope {
    /// Normalize into a snapshot. `is_partial` marks fast-fetch responses.
    pub fn into_snapshot(self, now_ms: u64, is_partial: bool) -> CacheSnapshot {
        CacheSnapshot {
            version: CacheSnapshot::SCHEMA_VERSION,
            words: self.data.words,
            levels: self.data.levels,
            topics: self.data.topics,
            last_updated_ms: now_ms,
            is_partial,
        }
    }
}

/// Envelope of `GET /favorite-words/:userId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesEnvelope {
    #[serde(default)]
    pub data: Vec<WordId>,
}

impl FavoritesEnvelope {
    pub fn into_ids(self) -> Vec<WordId> {
        self.data
    }
}
