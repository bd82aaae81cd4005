//! Acceptance policy for scored candidates.

use iss_model::LabelIndex;

use crate::analyze::StopWords;
use crate::error::{MapError, Result};
use crate::score::SimilarityScorer;

/// Default acceptance threshold. A candidate is accepted only when its score
/// is strictly greater.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Matching configuration shared by the bulk pass and rematches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    pub threshold: f64,
    pub stop_words: StopWords,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            stop_words: StopWords::default(),
        }
    }
}

impl MatchOptions {
    /// Set the acceptance threshold.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidThreshold`] unless `threshold` is within `[0, 1]`.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        Ok(self)
    }

    #[must_use]
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn scorer(&self) -> SimilarityScorer {
        SimilarityScorer::new(self.stop_words)
    }

    /// # Errors
    ///
    /// Fails when the threshold field was set out of range.
    pub fn selector(&self) -> Result<MatchSelector> {
        MatchSelector::new(self.threshold)
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(MapError::InvalidThreshold(threshold))
    }
}

/// Best-scoring candidate of one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Position of the candidate in the scored list.
    pub position: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSelector {
    threshold: f64,
}

impl Default for MatchSelector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MatchSelector {
    /// # Errors
    ///
    /// Returns [`MapError::InvalidThreshold`] unless `threshold` is within `[0, 1]`.
    pub fn new(threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Highest score, ties resolved to the earliest candidate.
    pub fn best(scores: &[f64]) -> Option<Selection> {
        let mut best: Option<Selection> = None;
        for (position, &score) in scores.iter().enumerate() {
            if best.is_none_or(|b| score > b.score) {
                best = Some(Selection { position, score });
            }
        }
        best
    }

    /// Best candidate if its score is strictly above the threshold.
    pub fn select(&self, scores: &[f64]) -> Option<Selection> {
        Self::best(scores).filter(|s| s.score > self.threshold)
    }

    /// Variable of the accepted candidate, where `scores` are aligned with
    /// `index.labels()`.
    pub fn select_variable<'a>(&self, scores: &[f64], index: &'a LabelIndex) -> Option<&'a str> {
        self.select(scores)
            .and_then(|s| index.variable_at(s.position))
            .filter(|v| !v.is_empty())
    }
}
