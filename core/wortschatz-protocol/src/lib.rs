#![no_std] // Critical for WASM compatibility

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod envelope;
pub mod ids;
pub mod model;

// Re-export core types for convenience
pub use envelope::{FavoritesEnvelope, WordListData, WordListEnvelope};
pub use ids::{LevelId, TopicId, UserId, WordId};
pub use model::{Article, CacheSnapshot, Level, PartOfSpeech, Topic, Word};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn sample_word() -> Word {
        Word {
            id: WordId(7),
            value: "Baum".to_string(),
            plural: Some("Bäume".to_string()),
            meanings: vec!["tree".to_string()],
            sentences: vec!["Der Baum ist groß.".to_string()],
            article: Some(Article::Der),
            level: Some(LevelId(1)),
            topic: Some(TopicId(3)),
            pos: Some(PartOfSpeech::Noun),
            synonyms: vec![],
            antonyms: vec![],
            watch_words: vec![WordId(8)],
        }
    }

    #[test]
    fn test_word_json_round_trip() {
        // Unicode content must survive serialization unchanged
        let original = sample_word();

        let json = serde_json::to_string(&original).expect("Failed to serialize Word");
        let back: Word = serde_json::from_str(&json).expect("Failed to deserialize Word");

        assert_eq!(original, back);
    }

    #[test]
    fn test_missing_lists_normalize_to_empty() {
        // The backend omits meaning/sentence arrays on bare records; the
        // boundary must turn absence into empty vectors, never null.
        let json = r#"{ "id": 1, "value": "doch" }"#;
        let word: Word = serde_json::from_str(json).expect("Failed to parse bare word");

        assert!(word.meanings.is_empty());
        assert!(word.sentences.is_empty());
        assert!(word.plural.is_none());
        assert!(word.is_unsorted());
    }

    #[test]
    fn test_envelope_normalization() {
        let json = r#"{ "data": { "words": [{ "id": 2, "value": "früh" }] } }"#;
        let envelope: WordListEnvelope =
            serde_json::from_str(json).expect("Failed to parse envelope");
        let snapshot = envelope.into_snapshot(1_000, true);

        assert_eq!(snapshot.words.len(), 1);
        assert!(snapshot.levels.is_empty());
        assert!(snapshot.is_partial);
        assert_eq!(snapshot.last_updated_ms, 1_000);
    }

    #[test]
    fn test_id_layout() {
        // Verify zero-cost abstraction: WordId(u32) should be exactly 4 bytes
        assert_eq!(core::mem::size_of::<WordId>(), 4);
        assert_eq!(core::mem::size_of::<Option<WordId>>(), 8); // u32 + tag (padding)
    }
}
