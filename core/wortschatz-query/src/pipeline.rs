//! The derivation pipeline: validity → level → topic → search → order →
//! paginate. Side-effect free; user actions re-run it against the in-memory
//! collection without touching the store.

use crate::collate;
use crate::criteria::FilterCriteria;
use crate::relevance;
use std::collections::HashMap;
use wortschatz_protocol::{Level, LevelId, Topic, TopicId, Word};

/// Fixed page size of every word-list view.
pub const PAGE_SIZE: usize = 40;

/// One ordered page of results plus the counts the pager needs.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage<'a> {
    pub items: Vec<&'a Word>,
    /// Count after filtering, before pagination.
    pub total_count: usize,
    pub page_count: usize,
    /// The page actually served; out-of-range requests clamp here.
    pub page: usize,
}

pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Run the full pipeline. Pure: the inputs are never mutated, identical
/// inputs yield identical output.
pub fn apply<'a>(
    words: &'a [Word],
    criteria: &FilterCriteria,
    levels: &[Level],
    topics: &[Topic],
) -> QueryPage<'a> {
    let level_labels: HashMap<LevelId, &str> =
        levels.iter().map(|l| (l.id, l.label.as_str())).collect();
    let topic_names: HashMap<TopicId, &str> =
        topics.iter().map(|t| (t.id, t.name.as_str())).collect();

    // Is the selected topic the sentinel uncategorized bucket?
    let sentinel_selected = criteria
        .topic
        .as_deref()
        .and_then(|name| topics.iter().find(|t| t.name == name))
        .is_some_and(Topic::is_uncategorized);

    // 1. Validity: empty-value words never reach a view
    let mut filtered: Vec<&Word> = words.iter().filter(|w| w.has_value()).collect();

    // 2. Level: exact label match
    if let Some(level) = criteria.level.as_deref() {
        filtered.retain(|w| {
            w.level
                .and_then(|id| level_labels.get(&id))
                .is_some_and(|label| *label == level)
        });
    }

    // 3. Topic: exact name match; the sentinel bucket also admits words with
    // neither topic nor meaning
    if let Some(topic) = criteria.topic.as_deref() {
        filtered.retain(|w| {
            let named = w
                .topic
                .and_then(|id| topic_names.get(&id))
                .is_some_and(|name| *name == topic);
            named || (sentinel_selected && w.is_unsorted())
        });
    }

    // 4. Search
    let needle = criteria.needle();
    if let Some(needle) = needle.as_deref() {
        filtered.retain(|w| relevance::matches(w, needle, criteria.mode));
    }

    // 5. Ordering: relevance-first when searching, alphabetical otherwise.
    // Decorate with precomputed keys so the comparator stays cheap.
    let mut decorated: Vec<(u32, String, &Word)> = filtered
        .into_iter()
        .map(|w| {
            let score = match needle.as_deref() {
                Some(needle) => relevance::score(w, needle).0,
                None => 0,
            };
            (score, collate::sort_key(&w.value), w)
        })
        .collect();
    decorated.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.value.cmp(&b.2.value))
    });

    // 6. Pagination with clamping
    let total_count = decorated.len();
    let page_count = page_count(total_count);
    let page = criteria.page.clamp(1, page_count.max(1));
    let start = (page - 1) * PAGE_SIZE;
    let items = decorated
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .map(|(_, _, w)| w)
        .collect();

    QueryPage {
        items,
        total_count,
        page_count,
        page,
    }
}
