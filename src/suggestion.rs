// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Completion suggestions produced by the suggestion engine.

/// One completion candidate.
///
/// Equality and ordering are defined by [`value`](Self::value) alone,
/// so that a suggestion set can be deduplicated without regard to
/// tooltip text.
#[derive(Clone, Debug)]
pub struct Suggestion {
    /// The text that would replace the token under the cursor.
    pub value: String,
    /// An optional short description shown alongside the completion.
    pub tooltip: Option<String>,
}

impl Suggestion {
    /// Construct a suggestion with no tooltip.
    pub fn new(value: impl Into<String>) -> Self {
        Suggestion {
            value: value.into(),
            tooltip: None,
        }
    }

    /// Construct a suggestion with a tooltip.
    pub fn with_tooltip(value: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Suggestion {
            value: value.into(),
            tooltip: Some(tooltip.into()),
        }
    }
}

impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Suggestion {}

/// Hook for post-filtering or re-ranking the union of suggestions
/// collected from every viable child of a node.
///
/// The default behavior (every child already only emits candidates
/// that start with the partial token) is a pass-through; a host
/// application can install a processor that does fuzzy matching,
/// case-insensitive matching, or re-ranking instead.
pub trait SuggestionProcessor: Send + Sync {
    /// Filter or reorder `candidates`, given the partial token (empty
    /// if the cursor sits between tokens) they are being offered for.
    fn process(&self, partial: &str, candidates: Vec<Suggestion>) -> Vec<Suggestion>;
}

/// The default [`SuggestionProcessor`]: a case-sensitive `starts_with`
/// filter, applied in case a child contributed a candidate that
/// doesn't actually match the current partial token.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrefixSuggestionProcessor;

impl SuggestionProcessor for PrefixSuggestionProcessor {
    fn process(&self, partial: &str, candidates: Vec<Suggestion>) -> Vec<Suggestion> {
        let mut seen = std::collections::HashSet::new();
        candidates
            .into_iter()
            .filter(|s| s.value.starts_with(partial))
            .filter(|s| seen.insert(s.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn suggestions_compare_by_value_only() {
        let a = Suggestion::new("foo");
        let b = Suggestion::with_tooltip("foo", "a tooltip");
        assert_eq!(a, b);
    }

    #[test]
    fn prefix_processor_filters_and_dedupes() {
        let processor = PrefixSuggestionProcessor;
        let candidates = vec![
            Suggestion::new("foo"),
            Suggestion::new("foobar"),
            Suggestion::new("bar"),
            Suggestion::new("foo"),
        ];
        let result = processor.process("foo", candidates);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].value, "foo");
        assert_eq!(result[1].value, "foobar");
    }
}
