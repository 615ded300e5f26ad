use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wortschatz_cache::{
    CacheState, CancelRegistry, Commit, FavoritesCache, FetchKind, FetchPlan, OptimisticToggle,
    Orchestrator, SnapshotStore, StorageBackend, StorageError, WordMutation, FAST_FETCH_LIMIT,
    INVALIDATION_EVENT, WORD_LIST_KEY,
};
use wortschatz_protocol::{UserId, Word, WordId, WordListEnvelope};
use wortschatz_query::{topics_for_level, FilterCriteria, Relation, RelationGraph};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

// Bindings against the page's localStorage (loaded via <script> in the SPA)
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = localStorage, js_name = getItem)]
    fn storage_get_item(key: &str) -> Option<String>;

    // `catch` so a quota error surfaces as Err instead of an exception
    #[wasm_bindgen(js_namespace = localStorage, js_name = setItem, catch)]
    fn storage_set_item(key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = localStorage, js_name = removeItem)]
    fn storage_remove_item(key: &str);
}

/// Durable storage backed by the browser's localStorage.
pub struct LocalStorageBackend;

impl StorageBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Option<String> {
        storage_get_item(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        storage_set_item(key, value)
            .map_err(|e| StorageError::WriteRejected(format!("{e:?}")))
    }

    fn delete(&mut self, key: &str) {
        storage_remove_item(key);
    }
}

/// Get current time in milliseconds
fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        use js_sys::Date;
        Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }
}

/// The structured responses sent back to JavaScript/React
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchPlanDto {
    seq: u32,
    kind: &'static str,
    limit: Option<u32>,
}

impl From<FetchPlan> for FetchPlanDto {
    fn from(plan: FetchPlan) -> Self {
        match plan.kind {
            FetchKind::Fast { limit } => Self {
                seq: plan.seq as u32,
                kind: "fast",
                limit: Some(limit),
            },
            FetchKind::Full => Self {
                seq: plan.seq as u32,
                kind: "full",
                limit: None,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommitDto {
    committed: bool,
    follow_up: Option<FetchPlanDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryPageDto<'a> {
    items: Vec<&'a Word>,
    total_count: usize,
    page_count: usize,
    page: usize,
}

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum MutationDto {
    Created { word: Word },
    Updated { word: Word },
    Deleted { id: u32 },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelatedDto {
    synonyms: Vec<u32>,
    antonyms: Vec<u32>,
    watch: Vec<u32>,
    synonym_cluster: Vec<u32>,
}

fn plan_for(seq: u32, kind: &str) -> FetchPlan {
    let kind = if kind == "fast" {
        FetchKind::Fast {
            limit: FAST_FETCH_LIMIT,
        }
    } else {
        FetchKind::Full
    };
    FetchPlan {
        seq: seq as u64,
        kind,
    }
}

/// The Engine Instance running in the Browser. JS owns fetch(); the engine
/// owns the cache policy and the in-memory collection.
#[wasm_bindgen]
pub struct WortschatzEngine {
    orchestrator: Orchestrator<LocalStorageBackend>,
    favorites: FavoritesCache<LocalStorageBackend>,
    registry: CancelRegistry,
    pending_toggles: HashMap<WordId, OptimisticToggle>,
}

#[wasm_bindgen]
impl WortschatzEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(user_id: u32) -> Self {
        Self {
            orchestrator: Orchestrator::new(
                SnapshotStore::new(LocalStorageBackend),
                WORD_LIST_KEY,
            ),
            favorites: FavoritesCache::new(
                SnapshotStore::new(LocalStorageBackend),
                UserId(user_id),
            ),
            registry: CancelRegistry::new(),
            pending_toggles: HashMap::new(),
        }
    }

    /// Event name for the cross-tab storage/custom invalidation signal.
    pub fn invalidation_event() -> String {
        INVALIDATION_EVENT.to_string()
    }

    /// Evaluate the persisted cache and return the fetch plans to run.
    pub fn mount(&mut self) -> JsValue {
        let plans: Vec<FetchPlanDto> = self
            .orchestrator
            .mount(now_ms())
            .into_iter()
            .map(Into::into)
            .collect();
        serde_wasm_bindgen::to_value(&plans).unwrap()
    }

    /// Feed a `GET /word/all` response back in. Returns the commit outcome
    /// and, after a fast commit, the follow-up full fetch.
    pub fn commit_fetch(&mut self, seq: u32, kind: &str, envelope: JsValue) -> Result<JsValue, JsValue> {
        let envelope: WordListEnvelope =
            serde_wasm_bindgen::from_value(envelope).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let dto = match self
            .orchestrator
            .commit_fetch(plan_for(seq, kind), envelope, now_ms())
        {
            Commit::Committed { follow_up } => CommitDto {
                committed: true,
                follow_up: follow_up.map(Into::into),
            },
            Commit::Discarded => CommitDto {
                committed: false,
                follow_up: None,
            },
        };
        Ok(serde_wasm_bindgen::to_value(&dto).unwrap())
    }

    pub fn fetch_failed(&mut self, seq: u32, kind: &str) {
        self.orchestrator.fetch_failed(plan_for(seq, kind));
    }

    /// Cross-tab invalidation arrived (or the user forced a refresh).
    pub fn invalidate(&mut self) -> JsValue {
        let plans: Vec<FetchPlanDto> = self
            .orchestrator
            .invalidate()
            .into_iter()
            .map(Into::into)
            .collect();
        serde_wasm_bindgen::to_value(&plans).unwrap()
    }

    /// Patch the cache after an acknowledged create/update/delete.
    pub fn apply_mutation(&mut self, mutation: JsValue) -> Result<(), JsValue> {
        let mutation: MutationDto =
            serde_wasm_bindgen::from_value(mutation).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mutation = match mutation {
            MutationDto::Created { word } => WordMutation::Created(word),
            MutationDto::Updated { word } => WordMutation::Updated(word),
            MutationDto::Deleted { id } => WordMutation::Deleted(WordId(id)),
        };
        self.orchestrator.apply_mutation(mutation, now_ms());
        Ok(())
    }

    /// Run the pipeline against the in-memory collection: criteria in,
    /// ordered page out.
    pub fn query(&self, criteria: JsValue) -> Result<JsValue, JsValue> {
        let criteria: FilterCriteria =
            serde_wasm_bindgen::from_value(criteria).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let snapshot = self.orchestrator.snapshot();
        let page = wortschatz_query::apply(
            &snapshot.words,
            &criteria,
            &snapshot.levels,
            &snapshot.topics,
        );
        let dto = QueryPageDto {
            items: page.items,
            total_count: page.total_count,
            page_count: page.page_count,
            page: page.page,
        };
        Ok(serde_wasm_bindgen::to_value(&dto).unwrap())
    }

    /// Topic dropdown choices for the given level label.
    pub fn topics_for_level(&self, level: Option<String>) -> JsValue {
        let snapshot = self.orchestrator.snapshot();
        let names = topics_for_level(
            &snapshot.words,
            &snapshot.levels,
            &snapshot.topics,
            level.as_deref(),
        );
        serde_wasm_bindgen::to_value(&names).unwrap()
    }

    pub fn state(&self) -> String {
        match self.orchestrator.state() {
            CacheState::Empty => "empty",
            CacheState::PartialLoading => "partialLoading",
            CacheState::PartialReady => "partialReady",
            CacheState::FullLoading => "fullLoading",
            CacheState::FullReady { fresh: true } => "fullReady",
            CacheState::FullReady { fresh: false } => "fullReadyStale",
        }
        .to_string()
    }

    /// Synonyms/antonyms/look-alikes of one word, for the detail card and
    /// quiz distractor selection.
    pub fn related_words(&self, word_id: u32) -> JsValue {
        let graph = RelationGraph::from_words(&self.orchestrator.snapshot().words);
        let id = WordId(word_id);
        let ids = |v: Vec<WordId>| v.into_iter().map(u32::from).collect::<Vec<u32>>();
        let dto = RelatedDto {
            synonyms: ids(graph.related(id, Relation::Synonym)),
            antonyms: ids(graph.related(id, Relation::Antonym)),
            watch: ids(graph.related(id, Relation::Watch)),
            synonym_cluster: ids(graph.synonym_cluster(id)),
        };
        serde_wasm_bindgen::to_value(&dto).unwrap()
    }

    // ---- favorites: instant paint, always revalidate ----

    pub fn favorites_mount(&mut self) -> JsValue {
        let ids: Vec<u32> = self.favorites.mount().iter().map(|id| id.0).collect();
        serde_wasm_bindgen::to_value(&ids).unwrap()
    }

    /// Replace with the server's id set after revalidation.
    pub fn favorites_commit(&mut self, ids: Vec<u32>) {
        self.favorites
            .commit(ids.into_iter().map(WordId).collect());
    }

    pub fn is_favorite(&self, word_id: u32) -> bool {
        self.favorites.contains(WordId(word_id))
    }

    /// Optimistic toggle: applied locally at once, settled when the REST call
    /// resolves.
    pub fn favorite_toggle(&mut self, word_id: u32) {
        let id = WordId(word_id);
        let toggle = self.favorites.begin_toggle(id);
        self.pending_toggles.insert(id, toggle);
    }

    pub fn favorite_settle(&mut self, word_id: u32, success: bool) {
        if let Some(toggle) = self.pending_toggles.remove(&WordId(word_id)) {
            if success {
                self.favorites.commit_toggle(toggle);
            } else {
                self.favorites.rollback_toggle(toggle);
            }
        }
    }

    // ---- per-word async actions (cancellation bookkeeping) ----

    /// Start a per-word request, superseding any in-flight one for that word.
    /// Returns the token serial to attach to the response.
    pub fn action_begin(&mut self, word_id: u32) -> u32 {
        self.registry.issue(WordId(word_id)).serial as u32
    }

    /// May this response still be applied?
    pub fn action_is_current(&self, word_id: u32, serial: u32) -> bool {
        self.registry.is_current(wortschatz_cache::CancelToken {
            word: WordId(word_id),
            serial: serial as u64,
        })
    }

    pub fn action_finish(&mut self, word_id: u32, serial: u32) {
        self.registry.finish(wortschatz_cache::CancelToken {
            word: WordId(word_id),
            serial: serial as u64,
        });
    }

    /// View teardown: cancel everything outstanding.
    pub fn teardown(&mut self) {
        self.registry.cancel_all();
        self.pending_toggles.clear();
    }
}
