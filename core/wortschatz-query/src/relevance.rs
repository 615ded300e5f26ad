use crate::criteria::SearchMode;
use bitflags::bitflags;
use wortschatz_protocol::Word;

bitflags! {
    /// Which fields of a word matched the needle. Drives result highlighting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MatchFields: u8 {
        const VALUE = 1;
        const PLURAL = 2;
        const MEANING = 4;
    }
}

pub const SCORE_EXACT: u32 = 100;
pub const SCORE_PREFIX: u32 = 50;
pub const SCORE_SUBSTRING: u32 = 10;

/// Score one field against a trimmed, lowercased needle.
fn field_score(field: &str, needle: &str) -> u32 {
    let field = field.trim().to_lowercase();
    if field.is_empty() {
        0
    } else if field == needle {
        SCORE_EXACT
    } else if field.starts_with(needle) {
        SCORE_PREFIX
    } else if field.contains(needle) {
        SCORE_SUBSTRING
    } else {
        0
    }
}

/// Does the word pass the search filter in the given mode?
pub fn matches(word: &Word, needle: &str, mode: SearchMode) -> bool {
    match mode {
        SearchMode::Word => {
            word.value.to_lowercase().contains(needle)
                || word
                    .plural
                    .as_deref()
                    .is_some_and(|p| p.to_lowercase().contains(needle))
        }
        SearchMode::Meaning => word
            .meanings
            .iter()
            .any(|m| m.to_lowercase().contains(needle)),
    }
}

/// Relevance of a word for ordering. Exact match on the singular, the plural
/// or any meaning scores 100, a prefix 50, a substring 10; the best field
/// wins. Returns the score and the set of fields that contributed it.
pub fn score(word: &Word, needle: &str) -> (u32, MatchFields) {
    let mut best = 0;
    let mut fields = MatchFields::empty();

    let mut consider = |s: u32, field: MatchFields| {
        if s > best {
            best = s;
            fields = field;
        } else if s == best && s > 0 {
            fields |= field;
        }
    };

    consider(field_score(&word.value, needle), MatchFields::VALUE);
    if let Some(plural) = word.plural.as_deref() {
        consider(field_score(plural, needle), MatchFields::PLURAL);
    }
    for meaning in &word.meanings {
        consider(field_score(meaning, needle), MatchFields::MEANING);
    }

    (best, fields)
}
