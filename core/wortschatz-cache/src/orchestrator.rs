//! The Cache Orchestrator: decides on each view mount whether to trust the
//! persisted snapshot, serve it immediately, or refresh in the foreground or
//! background.
//!
//! The orchestrator performs no I/O itself. `mount`/`invalidate` return
//! [`FetchPlan`]s; the host runs the HTTP requests and feeds the envelopes
//! back through [`Orchestrator::commit_fetch`]. Every plan carries a
//! monotonically increasing sequence number and any response older than the
//! last committed one is discarded, so a slow full fetch can never clobber a
//! newer snapshot regardless of arrival order.

use crate::store::{SnapshotStore, StorageBackend};
use tracing::{debug, warn};
use wortschatz_protocol::{CacheSnapshot, Word, WordId, WordListEnvelope};

/// Freshness window of a complete snapshot.
pub const EXPIRY_MS: u64 = 15 * 60 * 1000;
/// Bounded page size of the fast first-paint fetch.
pub const FAST_FETCH_LIMIT: u32 = 50;
/// Durable entry backing the word list views.
pub const WORD_LIST_KEY: &str = "wordListCache";
/// Client-side timeout the host should apply to every fetch plan; a timed-out
/// request is reported through [`Orchestrator::fetch_failed`] like any error.
pub const FETCH_TIMEOUT_MS: u64 = 60_000;
/// Name of the same-origin storage/custom event announcing invalidation to
/// other mounted instances.
pub const INVALIDATION_EVENT: &str = "wordListCacheInvalidated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    PartialLoading,
    PartialReady,
    FullLoading,
    FullReady { fresh: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// `GET /word/all?limit=N&page=1`
    Fast { limit: u32 },
    /// `GET /word/all?all=true`
    Full,
}

/// One network request the host must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub seq: u64,
    pub kind: FetchKind,
}

/// Outcome of feeding a response back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Snapshot replaced; `follow_up` is the completion fetch after a fast
    /// commit.
    Committed { follow_up: Option<FetchPlan> },
    /// The response was older than the last committed one.
    Discarded,
}

/// A local mutation already acknowledged by the REST API. Patches the
/// in-memory collection and re-persists; never triggers a refetch.
#[derive(Debug, Clone)]
pub enum WordMutation {
    Created(Word),
    Updated(Word),
    Deleted(WordId),
}

pub struct Orchestrator<B: StorageBackend> {
    store: SnapshotStore<B>,
    key: String,
    /// In-memory collection, owned by the mounting view for the session.
    snapshot: CacheSnapshot,
    state: CacheState,
    next_seq: u64,
    last_committed_seq: u64,
}

impl<B: StorageBackend> Orchestrator<B> {
    pub fn new(store: SnapshotStore<B>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            snapshot: CacheSnapshot::empty(),
            state: CacheState::Empty,
            next_seq: 1,
            last_committed_seq: 0,
        }
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    pub fn snapshot(&self) -> &CacheSnapshot {
        &self.snapshot
    }

    fn plan(&mut self, kind: FetchKind) -> FetchPlan {
        let seq = self.next_seq;
        self.next_seq += 1;
        FetchPlan { seq, kind }
    }

    /// Evaluate the persisted snapshot and return the fetches to run. The
    /// in-memory snapshot is populated before this returns, so whatever the
    /// store held is served immediately (stale-while-revalidate).
    pub fn mount(&mut self, now_ms: u64) -> Vec<FetchPlan> {
        match self.store.get(&self.key) {
            None => {
                self.state = CacheState::PartialLoading;
                debug!(key = %self.key, "no cache, starting fast/full sequence");
                vec![self.plan(FetchKind::Fast {
                    limit: FAST_FETCH_LIMIT,
                })]
            }
            Some(snapshot) if snapshot.is_partial => {
                self.snapshot = snapshot;
                self.state = CacheState::FullLoading;
                debug!(key = %self.key, "partial cache served, completing in background");
                vec![self.plan(FetchKind::Full)]
            }
            Some(snapshot) => {
                let age = snapshot.age_ms(now_ms);
                self.snapshot = snapshot;
                if age < EXPIRY_MS {
                    self.state = CacheState::FullReady { fresh: true };
                    vec![]
                } else {
                    self.state = CacheState::FullLoading;
                    debug!(key = %self.key, age_ms = age, "stale cache served, revalidating");
                    vec![self.plan(FetchKind::Full)]
                }
            }
        }
    }

    /// Replace the in-memory and persisted snapshot with a fetch response.
    /// Responses are committed at most once and strictly in sequence order.
    pub fn commit_fetch(
        &mut self,
        plan: FetchPlan,
        envelope: WordListEnvelope,
        now_ms: u64,
    ) -> Commit {
        if plan.seq <= self.last_committed_seq {
            debug!(seq = plan.seq, last = self.last_committed_seq, "stale response discarded");
            return Commit::Discarded;
        }
        self.last_committed_seq = plan.seq;

        match plan.kind {
            FetchKind::Fast { .. } => {
                let snapshot = envelope.into_snapshot(now_ms, true);
                self.store.put(&self.key, &snapshot);
                self.snapshot = snapshot;
                self.state = CacheState::FullLoading;
                // The completion fetch is issued only after the fast state is
                // committed; the sequence guard covers the remaining overlap.
                let follow_up = self.plan(FetchKind::Full);
                Commit::Committed {
                    follow_up: Some(follow_up),
                }
            }
            FetchKind::Full => {
                let snapshot = envelope.into_snapshot(now_ms, false);
                self.store.put(&self.key, &snapshot);
                self.snapshot = snapshot;
                self.state = CacheState::FullReady { fresh: true };
                Commit::Committed { follow_up: None }
            }
        }
    }

    /// A fetch failed. The prior serving state is kept; the next mount
    /// re-evaluates from scratch. No automatic retry.
    pub fn fetch_failed(&mut self, plan: FetchPlan) {
        if plan.seq <= self.last_committed_seq {
            return; // a newer response already landed
        }
        warn!(seq = plan.seq, "fetch failed, keeping last known snapshot");
        self.state = if self.snapshot.is_partial {
            CacheState::PartialReady
        } else if self.snapshot.last_updated_ms > 0 {
            CacheState::FullReady { fresh: false }
        } else {
            CacheState::Empty
        };
    }

    /// External invalidation signal (cross-view or cross-tab): drop the
    /// durable entry and restart the fast/full sequence.
    pub fn invalidate(&mut self) -> Vec<FetchPlan> {
        self.store.remove(&self.key);
        self.snapshot = CacheSnapshot::empty();
        self.state = CacheState::PartialLoading;
        vec![self.plan(FetchKind::Fast {
            limit: FAST_FETCH_LIMIT,
        })]
    }

    /// Patch the in-memory collection after an acknowledged mutation and
    /// re-persist the whole snapshot. Skips the state machine entirely.
    pub fn apply_mutation(&mut self, mutation: WordMutation, now_ms: u64) {
        match mutation {
            WordMutation::Created(word) => {
                self.snapshot.words.retain(|w| w.id != word.id);
                self.snapshot.words.push(word);
            }
            WordMutation::Updated(word) => {
                match self.snapshot.words.iter_mut().find(|w| w.id == word.id) {
                    Some(slot) => *slot = word,
                    None => self.snapshot.words.push(word),
                }
            }
            WordMutation::Deleted(id) => {
                self.snapshot.words.retain(|w| w.id != id);
            }
        }
        self.snapshot.last_updated_ms = now_ms;
        self.store.put(&self.key, &self.snapshot);
    }
}
