//! In-progress quiz resumption: a plain last-write-wins JSON blob outside the
//! snapshot contract. No compression, no staleness window.

use crate::store::{SnapshotStore, StorageBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const QUIZ_STATE_KEY: &str = "quizState";

pub struct QuizStateStore<B: StorageBackend> {
    store: SnapshotStore<B>,
}

impl<B: StorageBackend> QuizStateStore<B> {
    pub fn new(store: SnapshotStore<B>) -> Self {
        Self { store }
    }

    pub fn save<T: Serialize>(&mut self, state: &T) {
        self.store.put_raw(QUIZ_STATE_KEY, state);
    }

    /// `None` when absent or unparsable (e.g. written by an older version).
    pub fn load<T: DeserializeOwned>(&self) -> Option<T> {
        self.store.get_raw(QUIZ_STATE_KEY)
    }

    /// Called when a quiz finishes or is abandoned.
    pub fn clear(&mut self) {
        self.store.remove(QUIZ_STATE_KEY);
    }
}
