//! Label/variable pairs of a single dataset specification.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One `(label, variable)` pair as it appears in a specification file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub label: String,
    pub variable: String,
}

/// Ordered label/variable pairs belonging to one dataset (the core or a study).
///
/// Labels are not required to be unique. Use [`LabelSet::index`] to get the
/// label-keyed view used for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    name: String,
    entries: Vec<LabelEntry>,
}

impl LabelSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Build a label set from `(label, variable)` pairs.
    pub fn from_pairs<I, L, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new(name);
        for (label, variable) in pairs {
            set.push(label, variable);
        }
        set
    }

    pub fn push(&mut self, label: impl Into<String>, variable: impl Into<String>) {
        self.entries.push(LabelEntry {
            label: label.into(),
            variable: variable.into(),
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label-keyed view of the set.
    ///
    /// Labels keep the position of their first occurrence; when a label is
    /// repeated, the variable of its last occurrence wins.
    pub fn index(&self) -> LabelIndex {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut labels = Vec::new();
        let mut variables: Vec<String> = Vec::new();
        for entry in &self.entries {
            match positions.get(entry.label.as_str()) {
                Some(&pos) => variables[pos].clone_from(&entry.variable),
                None => {
                    positions.insert(entry.label.as_str(), labels.len());
                    labels.push(entry.label.clone());
                    variables.push(entry.variable.clone());
                }
            }
        }
        LabelIndex { labels, variables }
    }
}

/// Unique labels of a [`LabelSet`] with the variable each one resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelIndex {
    labels: Vec<String>,
    variables: Vec<String>,
}

impl LabelIndex {
    /// Candidate labels in first-occurrence order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Variable of the candidate at `position` in [`Self::labels`].
    pub fn variable_at(&self, position: usize) -> Option<&str> {
        self.variables.get(position).map(String::as_str)
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|pos| self.variable_at(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.variables.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
