//! Level-scoped topic choices for the filter dropdowns.

use crate::collate;
use std::collections::HashMap;
use wortschatz_protocol::{Level, LevelId, Topic, TopicId, Word};

/// Topic names available under the given level label (all levels when
/// `None`): every name that appears on at least one word in scope, in
/// collation order, with the sentinel uncategorized topic appended last
/// whenever its bucket is non-empty in scope.
pub fn topics_for_level(
    words: &[Word],
    levels: &[Level],
    topics: &[Topic],
    level_label: Option<&str>,
) -> Vec<String> {
    let level_labels: HashMap<LevelId, &str> =
        levels.iter().map(|l| (l.id, l.label.as_str())).collect();
    let topic_names: HashMap<TopicId, &str> =
        topics.iter().map(|t| (t.id, t.name.as_str())).collect();

    let in_scope = |w: &Word| {
        w.has_value()
            && match level_label {
                Some(label) => w
                    .level
                    .and_then(|id| level_labels.get(&id))
                    .is_some_and(|l| *l == label),
                None => true,
            }
    };

    let mut names: Vec<&str> = Vec::new();
    let mut bucket_occupied = false;

    for word in words.iter().filter(|w| in_scope(w)) {
        match word.topic {
            Some(id) if id != Topic::UNCATEGORIZED => {
                if let Some(&name) = topic_names.get(&id) {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
            Some(_) => bucket_occupied = true,
            None => {
                if word.is_unsorted() {
                    bucket_occupied = true;
                }
            }
        }
    }

    names.sort_by(|a, b| collate::compare(a, b));

    let mut result: Vec<String> = names.into_iter().map(str::to_string).collect();
    if bucket_occupied {
        if let Some(sentinel) = topics.iter().find(|t| t.is_uncategorized()) {
            result.push(sentinel.name.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use wortschatz_protocol::WordId;

    fn word(id: u32, value: &str, level: Option<u32>, topic: Option<u32>) -> Word {
        Word {
            id: WordId(id),
            value: value.to_string(),
            plural: None,
            meanings: vec![],
            sentences: vec![],
            article: None,
            level: level.map(LevelId),
            topic: topic.map(TopicId),
            pos: None,
            synonyms: vec![],
            antonyms: vec![],
            watch_words: vec![],
        }
    }

    fn fixture() -> (Vec<Word>, Vec<Level>, Vec<Topic>) {
        let levels = vec![
            Level {
                id: LevelId(1),
                label: "A1".to_string(),
                restricted: false,
            },
            Level {
                id: LevelId(2),
                label: "B1".to_string(),
                restricted: false,
            },
        ];
        let topics = vec![
            Topic {
                id: Topic::UNCATEGORIZED,
                name: "Unsortiert".to_string(),
                level: None,
            },
            Topic {
                id: TopicId(3),
                name: "Tiere".to_string(),
                level: Some(LevelId(1)),
            },
            Topic {
                id: TopicId(4),
                name: "Essen".to_string(),
                level: Some(LevelId(2)),
            },
        ];
        let words = vec![
            word(1, "Maus", Some(1), Some(3)),
            word(2, "Brot", Some(2), Some(4)),
            word(3, "doch", Some(1), None), // unsorted, A1
        ];
        (words, levels, topics)
    }

    #[test]
    fn test_topics_scoped_to_level() {
        let (words, levels, topics) = fixture();

        let a1 = topics_for_level(&words, &levels, &topics, Some("A1"));
        assert_eq!(a1, vec!["Tiere".to_string(), "Unsortiert".to_string()]);

        let b1 = topics_for_level(&words, &levels, &topics, Some("B1"));
        assert_eq!(b1, vec!["Essen".to_string()]);
    }

    #[test]
    fn test_all_levels_in_collation_order_sentinel_last() {
        let (words, levels, topics) = fixture();
        let all = topics_for_level(&words, &levels, &topics, None);
        assert_eq!(
            all,
            vec![
                "Essen".to_string(),
                "Tiere".to_string(),
                "Unsortiert".to_string()
            ]
        );
    }

    #[test]
    fn test_sentinel_absent_when_bucket_empty() {
        let (mut words, levels, topics) = fixture();
        words.retain(|w| w.value != "doch");

        let a1 = topics_for_level(&words, &levels, &topics, Some("A1"));
        assert_eq!(a1, vec!["Tiere".to_string()]);
    }
}
