//! Term extraction for label text.

use serde::{Deserialize, Serialize};

/// Function words dropped by [`StopWords::English`].
const ENGLISH_STOP_WORDS: &[&str] = &[
    "am", "an", "and", "are", "as", "at", "be", "been", "being", "but", "by", "did", "do", "does",
    "for", "from", "had", "has", "have", "he", "her", "his", "if", "in", "into", "is", "it", "its",
    "me", "my", "of", "on", "or", "our", "she", "so", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "to", "was", "we", "were", "with", "you", "your",
];

/// Stop-word policy of the analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWords {
    /// Drop common English function words.
    #[default]
    English,
    /// Keep every word token.
    None,
}

impl StopWords {
    pub fn contains(self, term: &str) -> bool {
        match self {
            Self::English => ENGLISH_STOP_WORDS.contains(&term),
            Self::None => false,
        }
    }
}

/// Split `text` into lowercase word terms.
///
/// A term is a run of at least two alphanumeric or `_` characters.
pub fn analyze(text: &str, stop_words: StopWords) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|term| term.chars().count() >= 2 && !stop_words.contains(term))
        .map(str::to_string)
        .collect()
}
