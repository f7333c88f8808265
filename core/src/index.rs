use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted sparse document -> term -> weight matrix. A (document,
/// term) entry exists iff the term occurs at least once in that document;
/// an absent entry is an implicit weight of 0 and is never materialized.
///
/// Both key levels are BTreeMaps so the serialized artifact has a stable,
/// sorted nested-object layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedIndex {
    weights: BTreeMap<String, BTreeMap<String, f64>>,
}

impl WeightedIndex {
    pub fn from_weights(weights: BTreeMap<String, BTreeMap<String, f64>>) -> Self {
        Self { weights }
    }

    pub fn doc_count(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Stored weight for `term` in `doc_id`; None when the term does not
    /// occur in that document.
    pub fn weight(&self, doc_id: &str, term: &str) -> Option<f64> {
        self.weights.get(doc_id).and_then(|terms| terms.get(term)).copied()
    }

    /// Iterate documents with their term weight maps, in doc-id order.
    pub fn documents(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, f64>)> {
        self.weights.iter()
    }
}
