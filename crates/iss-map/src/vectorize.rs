//! TF-IDF term weighting.
//!
//! A [`TfidfModel`] is fitted on a document collection and then maps any text
//! to an L2-normalized sparse [`TermVector`]. Terms outside the fitted
//! vocabulary are ignored.

use std::collections::HashMap;

use crate::analyze::{StopWords, analyze};

/// Vocabulary and smoothed inverse document frequencies of a fitted corpus.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    stop_words: StopWords,
}

impl TfidfModel {
    /// Fit the vocabulary and IDF weights on `documents`.
    ///
    /// `idf(t) = ln((1 + n) / (1 + df(t))) + 1` where `n` is the number of
    /// documents.
    pub fn fit<S: AsRef<str>>(documents: &[S], stop_words: StopWords) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        for document in documents {
            let mut terms = analyze(document.as_ref(), stop_words);
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                let next = vocabulary.len();
                let id = *vocabulary.entry(term).or_insert(next);
                if id == doc_freq.len() {
                    doc_freq.push(0);
                }
                doc_freq[id] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self {
            vocabulary,
            idf,
            stop_words,
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&id| self.idf[id])
    }

    /// Weight `text` by term count times IDF and normalize to unit length.
    pub fn transform(&self, text: &str) -> TermVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in analyze(text, self.stop_words) {
            if let Some(&id) = self.vocabulary.get(&term) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(id, count)| (id, count * self.idf[id]))
            .collect();
        weights.sort_unstable_by_key(|&(id, _)| id);

        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weights {
                *w /= norm;
            }
        }
        TermVector { weights }
    }
}

/// Sparse unit-length term vector, sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: Vec<(usize, f64)>,
}

impl TermVector {
    /// True when the text had no term from the vocabulary.
    pub fn is_zero(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Cosine similarity with `other`; 0 when either vector is zero.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.weights.len() && j < other.weights.len() {
            let (a_id, a_w) = self.weights[i];
            let (b_id, b_w) = other.weights[j];
            match a_id.cmp(&b_id) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot.clamp(0.0, 1.0)
    }
}
