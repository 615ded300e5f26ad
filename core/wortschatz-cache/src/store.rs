//! The Persistent Cache Store: a dumb, durable, compressed blob store keyed
//! by string. Staleness policy lives in the orchestrator, not here.
//!
//! Values are stored as `"lz4:"` + base64(lz4) of the snapshot JSON. Entries
//! without the prefix are parsed as plain JSON so legacy uncompressed values
//! keep working. Every failure path degrades to "no cache": the app must stay
//! usable from the in-memory/network path alone.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;
use wortschatz_protocol::CacheSnapshot;

const COMPRESSED_PREFIX: &str = "lz4:";

#[derive(Debug, Error)]
pub enum StorageError {
    /// Quota exceeded or the backend rejected the write.
    #[error("storage write rejected: {0}")]
    WriteRejected(String),
}

/// String-keyed durable key-value storage. Implemented by localStorage in the
/// browser and by [`MemoryBackend`] in tests and tools.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&mut self, key: &str);
}

/// In-memory backend for tests and the snapshot compiler.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Encode a JSON string into the durable wire form. Compression is skipped
/// when it does not pay off (tiny payloads), which doubles as the fallback
/// the contract requires: the plain value is always a valid entry.
pub fn encode_blob(json: &str) -> String {
    let compressed = format!(
        "{}{}",
        COMPRESSED_PREFIX,
        BASE64.encode(compress_prepend_size(json.as_bytes()))
    );
    // Keep the plain value when compression does not pay off, unless it
    // would be mistaken for a compressed entry on the way back in.
    if compressed.len() < json.len() || json.starts_with(COMPRESSED_PREFIX) {
        compressed
    } else {
        json.to_string()
    }
}

/// Decode a durable value back to JSON. A value without the prefix is
/// returned unchanged (legacy uncompressed entry); a corrupt compressed value
/// yields `None`.
pub fn decode_blob(raw: &str) -> Option<String> {
    let Some(body) = raw.strip_prefix(COMPRESSED_PREFIX) else {
        return Some(raw.to_string());
    };
    let bytes = BASE64.decode(body).ok()?;
    let json = decompress_size_prepended(&bytes).ok()?;
    String::from_utf8(json).ok()
}

/// Typed facade over a [`StorageBackend`] for snapshots plus raw JSON blobs
/// (favorites, quiz state).
pub struct SnapshotStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> SnapshotStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Serialize, compress and persist. Write failures are logged and
    /// swallowed: persistence is best-effort.
    pub fn put(&mut self, key: &str, snapshot: &CacheSnapshot) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(err) => {
                warn!(key, %err, "snapshot serialization failed, entry not persisted");
                return;
            }
        };
        if let Err(err) = self.backend.write(key, &encode_blob(&json)) {
            warn!(key, %err, "snapshot write failed, continuing without persistence");
        }
    }

    /// `None` for absent, corrupt or unparseable entries: the orchestrator
    /// treats all of these as "no cache".
    pub fn get(&self, key: &str) -> Option<CacheSnapshot> {
        let raw = self.backend.read(key)?;
        let json = match decode_blob(&raw) {
            Some(json) => json,
            None => {
                warn!(key, "cache entry failed to decompress, treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(key, %err, "cache entry failed to parse, treating as absent");
                None
            }
        }
    }

    /// Explicit cache bust (e.g. after a bulk admin mutation).
    pub fn remove(&mut self, key: &str) {
        self.backend.delete(key);
    }

    /// Last-write-wins plain JSON blob, uncompressed (favorites, quiz state).
    pub fn put_raw<T: Serialize>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                warn!(key, %err, "blob serialization failed, entry not persisted");
                return;
            }
        };
        if let Err(err) = self.backend.write(key, &json) {
            warn!(key, %err, "blob write failed, continuing without persistence");
        }
    }

    pub fn get_raw<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "blob failed to parse, treating as absent");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wortschatz_protocol::{Word, WordId};

    fn snapshot_with(values: &[&str]) -> CacheSnapshot {
        let mut snapshot = CacheSnapshot::empty();
        snapshot.last_updated_ms = 42;
        snapshot.words = values
            .iter()
            .enumerate()
            .map(|(i, v)| Word {
                id: WordId(i as u32),
                value: v.to_string(),
                plural: None,
                meanings: vec![format!("meaning of {v}")],
                sentences: vec![],
                article: None,
                level: None,
                topic: None,
                pos: None,
                synonyms: vec![],
                antonyms: vec![],
                watch_words: vec![],
            })
            .collect();
        snapshot
    }

    #[test]
    fn test_round_trip_with_umlauts() {
        let mut store = SnapshotStore::new(MemoryBackend::new());
        let snapshot = snapshot_with(&["früh", "Bäume", "Straße"]);

        store.put("wordListCache", &snapshot);
        let back = store.get("wordListCache").expect("entry should exist");

        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_legacy_uncompressed_entry_still_reads() {
        let snapshot = snapshot_with(&["Haus"]);
        let json = serde_json::to_string(&snapshot).unwrap();

        let mut backend = MemoryBackend::new();
        backend.write("wordListCache", &json).unwrap();

        let store = SnapshotStore::new(backend);
        assert_eq!(store.get("wordListCache"), Some(snapshot));
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let mut backend = MemoryBackend::new();
        backend.write("wordListCache", "lz4:!!not base64!!").unwrap();
        backend.write("other", "{ definitely not a snapshot").unwrap();

        let store = SnapshotStore::new(backend);
        assert!(store.get("wordListCache").is_none());
        assert!(store.get("other").is_none());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        struct RejectingBackend;
        impl StorageBackend for RejectingBackend {
            fn read(&self, _key: &str) -> Option<String> {
                None
            }
            fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
                Err(StorageError::WriteRejected("quota exceeded".to_string()))
            }
            fn delete(&mut self, _key: &str) {}
        }

        let mut store = SnapshotStore::new(RejectingBackend);
        // Must not panic or surface the error
        store.put("wordListCache", &snapshot_with(&["Haus"]));
        assert!(store.get("wordListCache").is_none());
    }

    #[test]
    fn test_remove_busts_entry() {
        let mut store = SnapshotStore::new(MemoryBackend::new());
        store.put("wordListCache", &snapshot_with(&["Haus"]));
        store.remove("wordListCache");
        assert!(store.get("wordListCache").is_none());
    }

    #[test]
    fn test_large_snapshot_actually_compresses() {
        let values: Vec<String> = (0..500).map(|i| format!("Wort nummer {i}")).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let snapshot = snapshot_with(&refs);
        let json = serde_json::to_string(&snapshot).unwrap();

        let encoded = encode_blob(&json);
        assert!(encoded.starts_with("lz4:"));
        assert!(encoded.len() < json.len());
        assert_eq!(decode_blob(&encoded), Some(json));
    }

    proptest! {
        #[test]
        fn prop_blob_codec_is_lossless(json in "[\\PC]{0,400}") {
            // Arbitrary unicode payloads survive the encode/decode pair
            prop_assert_eq!(decode_blob(&encode_blob(&json)), Some(json));
        }
    }
}
