//! German dictionary collation keys.
//!
//! Display forms carry qualifiers ("(ugs.)", "sich freuen, …") that would
//! push entries out of natural alphabetical position. The key strips
//! parenthesized content and punctuation (hyphens and spaces survive),
//! collapses whitespace, lowercases, and folds umlauts per DIN 5007-1 so
//! "Bäume" sorts with "Baume".

use core::cmp::Ordering;
use nom::branch::alt;
use nom::bytes::complete::{take_until, take_while1};
use nom::character::complete::char;
use nom::combinator::map;
use nom::sequence::delimited;
use nom::IResult;

/// Characters that participate in alphabetical comparison.
fn is_sortable(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c.is_whitespace()
}

/// A balanced "(...)" group, dropped entirely.
fn parenthesized(input: &str) -> IResult<&str, Option<&str>> {
    map(delimited(char('('), take_until(")"), char(')')), |_| None)(input)
}

fn sortable_run(input: &str) -> IResult<&str, Option<&str>> {
    map(take_while1(is_sortable), Some)(input)
}

/// Strip qualifiers and punctuation, collapse whitespace, lowercase.
pub fn display_key(input: &str) -> String {
    let mut rest = input;
    let mut kept = String::with_capacity(input.len());

    while !rest.is_empty() {
        match alt((parenthesized, sortable_run))(rest) {
            Ok((next, segment)) => {
                if let Some(s) = segment {
                    kept.push_str(s);
                }
                rest = next;
            }
            Err(_) => {
                // Skip one char to recover (stray punctuation, unmatched paren)
                if let Some(c) = rest.chars().next() {
                    rest = &rest[c.len_utf8()..];
                } else {
                    break;
                }
            }
        }
    }

    let mut out = String::with_capacity(kept.len());
    for part in kept.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for c in part.chars() {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Collation key: display key with DIN 5007-1 umlaut folding.
pub fn sort_key(input: &str) -> String {
    let mut key = String::new();
    for c in display_key(input).chars() {
        match c {
            'ä' => key.push('a'),
            'ö' => key.push('o'),
            'ü' => key.push('u'),
            'ß' => key.push_str("ss"),
            _ => key.push(c),
        }
    }
    key
}

/// Locale-aware comparison of two display forms. Ties on the folded key fall
/// back to the raw strings so the ordering stays total.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_parenthesized_qualifiers() {
        assert_eq!(display_key("(sich) freuen"), "freuen");
        assert_eq!(display_key("Haus (ugs.)"), "haus");
    }

    #[test]
    fn test_keeps_hyphens_and_spaces() {
        assert_eq!(display_key("E-Mail schreiben"), "e-mail schreiben");
    }

    #[test]
    fn test_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(display_key("\"der   Baum!\""), "der baum");
    }

    #[test]
    fn test_umlaut_folding() {
        assert_eq!(sort_key("Bäume"), "baume");
        assert_eq!(sort_key("Straße"), "strasse");
    }

    #[test]
    fn test_umlauts_sort_with_base_letters() {
        // DIN 5007-1: Ä between "Arm" and "Bein", not after "Zug"
        let mut words = vec!["Zug", "Ärger", "Arm", "Bein"];
        words.sort_by(|a, b| compare(a, b));
        assert_eq!(words, vec!["Ärger", "Arm", "Bein", "Zug"]);
    }

    #[test]
    fn test_qualifier_does_not_break_position() {
        let mut words = vec!["Zeit", "(sich) ärgern", "arbeiten"];
        words.sort_by(|a, b| compare(a, b));
        assert_eq!(words, vec!["arbeiten", "(sich) ärgern", "Zeit"]);
    }

    #[test]
    fn test_unmatched_paren_recovers() {
        // Resilient path: the stray '(' is skipped, letters survive
        assert_eq!(display_key("Haus (ugs."), "haus ugs");
    }
}
