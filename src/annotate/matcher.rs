//! Locating anchor text inside a document that may have changed.

use crate::model::TextRange;

/// Longest token prefix tried once the full anchor is missing.
pub const MAX_PREFIX_TOKENS: usize = 10;

/// Shortest token prefix accepted. Shorter prefixes are too ambiguous.
pub const MIN_PREFIX_TOKENS: usize = 3;

/// Where an anchor was found, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The trimmed anchor occurs verbatim.
    Exact(TextRange),
    /// Only the first `tokens` whitespace-separated words were found.
    Prefix {
        /// Location of the matched prefix.
        range: TextRange,
        /// Number of anchor tokens in the prefix.
        tokens: usize,
    },
    /// Neither the anchor nor any acceptable prefix occurs.
    NoMatch,
}

impl MatchOutcome {
    /// The matched range, for either kind of match.
    #[must_use]
    pub fn range(&self) -> Option<TextRange> {
        match self {
            Self::Exact(range) | Self::Prefix { range, .. } => Some(*range),
            Self::NoMatch => None,
        }
    }
}

/// Finds anchors in document text.
///
/// Matching strategy (in priority order):
/// 1. Exact substring match of the trimmed anchor, first occurrence
/// 2. Longest token prefix, from `max_prefix_tokens` down to `min_prefix_tokens`,
///    re-joined with single spaces
///
/// There is no approximate matching. An anchor repeated in the document
/// always resolves to its first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMatcher {
    /// Upper bound on prefix length, in tokens.
    pub max_prefix_tokens: usize,
    /// Lower bound on prefix length, in tokens.
    pub min_prefix_tokens: usize,
}

impl Default for TextMatcher {
    fn default() -> Self {
        Self {
            max_prefix_tokens: MAX_PREFIX_TOKENS,
            min_prefix_tokens: MIN_PREFIX_TOKENS,
        }
    }
}

impl TextMatcher {
    /// Locates `anchor` in `text`.
    #[must_use]
    pub fn locate(&self, text: &str, anchor: &str) -> MatchOutcome {
        let needle = anchor.trim();
        if needle.is_empty() {
            return MatchOutcome::NoMatch;
        }

        if let Some(range) = find(text, needle) {
            return MatchOutcome::Exact(range);
        }

        let tokens: Vec<&str> = needle.split_whitespace().collect();
        let longest = tokens.len().min(self.max_prefix_tokens);
        let shortest = self.min_prefix_tokens.max(1);

        for len in (shortest..=longest).rev() {
            let prefix = tokens[..len].join(" ");
            if let Some(range) = find(text, &prefix) {
                return MatchOutcome::Prefix { range, tokens: len };
            }
        }

        MatchOutcome::NoMatch
    }
}

fn find(text: &str, needle: &str) -> Option<TextRange> {
    text.find(needle).map(|start| TextRange {
        start,
        end: start + needle.len(),
    })
}
