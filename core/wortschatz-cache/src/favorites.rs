//! Favorites: a parallel per-user id-set cache. Unlike the word list it is
//! always revalidated; the stored set exists only for instant paint before
//! the re-fetch lands. Toggles are optimistic: apply locally, then commit on
//! server ack or roll back on failure.

use crate::store::{SnapshotStore, StorageBackend};
use std::collections::BTreeSet;
use wortschatz_protocol::{UserId, WordId};

/// Prefix of the durable favorites entry; the user id is appended so two
/// accounts on one machine never bleed into each other.
pub const FAVORITES_KEY_PREFIX: &str = "favorites";

/// An in-flight optimistic toggle. Consumed exactly once by
/// [`FavoritesCache::commit_toggle`] or [`FavoritesCache::rollback_toggle`].
#[must_use = "an optimistic toggle must be committed or rolled back"]
#[derive(Debug)]
pub struct OptimisticToggle {
    word: WordId,
    was_favorite: bool,
}

pub struct FavoritesCache<B: StorageBackend> {
    store: SnapshotStore<B>,
    user: UserId,
    ids: BTreeSet<WordId>,
}

impl<B: StorageBackend> FavoritesCache<B> {
    pub fn new(store: SnapshotStore<B>, user: UserId) -> Self {
        Self {
            store,
            user,
            ids: BTreeSet::new(),
        }
    }

    fn key(&self) -> String {
        format!("{}:{}", FAVORITES_KEY_PREFIX, self.user.0)
    }

    /// Load the last-known set for instant paint. The caller must still
    /// re-fetch from `GET /favorite-words/:userId` and call [`Self::commit`];
    /// there is no freshness window on favorites.
    pub fn mount(&mut self) -> &BTreeSet<WordId> {
        if let Some(stored) = self.store.get_raw::<Vec<WordId>>(&self.key()) {
            self.ids = stored.into_iter().collect();
        }
        &self.ids
    }

    /// Replace the set with the server's answer and persist it.
    pub fn commit(&mut self, ids: Vec<WordId>) {
        self.ids = ids.into_iter().collect();
        self.persist();
    }

    pub fn contains(&self, word: WordId) -> bool {
        self.ids.contains(&word)
    }

    pub fn ids(&self) -> &BTreeSet<WordId> {
        &self.ids
    }

    /// Apply the toggle locally and hand back the transaction. The caller
    /// issues the POST/DELETE and settles the transaction with the outcome.
    pub fn begin_toggle(&mut self, word: WordId) -> OptimisticToggle {
        let was_favorite = self.ids.contains(&word);
        if was_favorite {
            self.ids.remove(&word);
        } else {
            self.ids.insert(word);
        }
        OptimisticToggle { word, was_favorite }
    }

    /// The remote call succeeded: keep the local change and persist it.
    pub fn commit_toggle(&mut self, _toggle: OptimisticToggle) {
        self.persist();
    }

    /// The remote call failed: restore the snapshot taken at begin time.
    pub fn rollback_toggle(&mut self, toggle: OptimisticToggle) {
        if toggle.was_favorite {
            self.ids.insert(toggle.word);
        } else {
            self.ids.remove(&toggle.word);
        }
    }

    fn persist(&mut self) {
        let ids: Vec<WordId> = self.ids.iter().copied().collect();
        let key = self.key();
        self.store.put_raw(&key, &ids);
    }
}
