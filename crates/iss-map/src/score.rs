//! Label similarity scoring.
//!
//! Every call fits a fresh [`TfidfModel`] on the queries and candidates it is
//! given, so the same pair of labels can score differently when the
//! surrounding batch changes.

use tracing::trace;

use crate::analyze::StopWords;
use crate::vectorize::TfidfModel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimilarityScorer {
    stop_words: StopWords,
}

impl SimilarityScorer {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    pub fn stop_words(&self) -> StopWords {
        self.stop_words
    }

    /// Score one query against every candidate.
    ///
    /// The vector space is fitted on the query plus the candidates. Returns one
    /// value in `[0, 1]` per candidate, in candidate order.
    pub fn score<S: AsRef<str>>(&self, query: &str, candidates: &[S]) -> Vec<f64> {
        self.score_batch(&[query], candidates)
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Score every query against every candidate using one joint fit over all
    /// queries and candidates.
    ///
    /// Returns one row of candidate scores per query.
    pub fn score_batch<Q, S>(&self, queries: &[Q], candidates: &[S]) -> Vec<Vec<f64>>
    where
        Q: AsRef<str>,
        S: AsRef<str>,
    {
        if candidates.is_empty() {
            return vec![Vec::new(); queries.len()];
        }

        let documents: Vec<&str> = queries
            .iter()
            .map(|q| q.as_ref())
            .chain(candidates.iter().map(|c| c.as_ref()))
            .collect();
        let model = TfidfModel::fit(&documents, self.stop_words);
        trace!(
            documents = documents.len(),
            vocabulary = model.vocabulary_len(),
            "fitted label vector space"
        );

        let candidate_vectors: Vec<_> = candidates
            .iter()
            .map(|c| model.transform(c.as_ref()))
            .collect();

        queries
            .iter()
            .map(|q| {
                let query_vector = model.transform(q.as_ref());
                candidate_vectors
                    .iter()
                    .map(|c| query_vector.cosine(c))
                    .collect()
            })
            .collect()
    }
}
