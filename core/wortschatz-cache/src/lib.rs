pub mod favorites;
pub mod orchestrator;
pub mod quiz;
pub mod registry;
pub mod store;

pub use favorites::{FavoritesCache, OptimisticToggle, FAVORITES_KEY_PREFIX};
pub use orchestrator::{
    CacheState, Commit, FetchKind, FetchPlan, Orchestrator, WordMutation, EXPIRY_MS,
    FAST_FETCH_LIMIT, FETCH_TIMEOUT_MS, INVALIDATION_EVENT, WORD_LIST_KEY,
};
pub use quiz::{QuizStateStore, QUIZ_STATE_KEY};
pub use registry::{CancelRegistry, CancelToken};
pub use store::{MemoryBackend, SnapshotStore, StorageBackend, StorageError};
