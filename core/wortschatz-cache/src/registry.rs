//! Cancellation tokens for per-word async actions.
//!
//! Issuing a token for a word supersedes any outstanding token for the same
//! word, so a newer request's response can never be overwritten by an older
//! one. All tokens are cancelled on view teardown to prevent state updates on
//! unmounted views.

use std::collections::HashMap;
use wortschatz_protocol::WordId;

/// Handle returned to the caller alongside the async request. Check with
/// [`CancelRegistry::is_current`] before applying the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelToken {
    pub word: WordId,
    /// Public so hosts can round-trip tokens across an FFI boundary.
    pub serial: u64,
}

#[derive(Debug, Default)]
pub struct CancelRegistry {
    active: HashMap<WordId, u64>,
    next_serial: u64,
}

impl CancelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for a word, cancelling any in-flight request for it.
    pub fn issue(&mut self, word: WordId) -> CancelToken {
        self.next_serial += 1;
        self.active.insert(word, self.next_serial);
        CancelToken {
            word,
            serial: self.next_serial,
        }
    }

    /// A response may only be applied while its token is still current.
    pub fn is_current(&self, token: CancelToken) -> bool {
        self.active.get(&token.word) == Some(&token.serial)
    }

    /// Mark a request finished; a superseded token is a no-op.
    pub fn finish(&mut self, token: CancelToken) {
        if self.is_current(token) {
            self.active.remove(&token.word);
        }
    }

    pub fn cancel(&mut self, word: WordId) {
        self.active.remove(&word);
    }

    /// View teardown: nothing outstanding may touch state afterwards.
    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    pub fn outstanding(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_supersedes_old_one() {
        let mut registry = CancelRegistry::new();
        let first = registry.issue(WordId(7));
        let second = registry.issue(WordId(7));

        // The older response must be dropped, the newer one applied
        assert!(!registry.is_current(first));
        assert!(registry.is_current(second));
    }

    #[test]
    fn test_words_are_independent() {
        let mut registry = CancelRegistry::new();
        let a = registry.issue(WordId(1));
        let b = registry.issue(WordId(2));

        assert!(registry.is_current(a));
        assert!(registry.is_current(b));
    }

    #[test]
    fn test_finish_clears_only_current() {
        let mut registry = CancelRegistry::new();
        let old = registry.issue(WordId(1));
        let new = registry.issue(WordId(1));

        registry.finish(old); // superseded, must not cancel the live one
        assert!(registry.is_current(new));

        registry.finish(new);
        assert_eq!(registry.outstanding(), 0);
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let mut registry = CancelRegistry::new();
        let a = registry.issue(WordId(1));
        let b = registry.issue(WordId(2));

        registry.cancel_all();
        assert!(!registry.is_current(a));
        assert!(!registry.is_current(b));
        assert_eq!(registry.outstanding(), 0);
    }
}
