use crate::error::Error;
use crate::index::WeightedIndex;
use crate::stats::{CorpusStats, Document};
use std::collections::{BTreeMap, HashMap};

/// BM25 tuning parameters: `k` saturates term frequency, `b` scales
/// document-length normalization.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    pub k: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k: 1.0, b: 0.75 }
    }
}

/// idf(t) = log2(1 + (N - df + 0.5) / (df + 0.5)). Strictly decreasing in
/// df for a fixed N.
pub fn idf(doc_count: usize, doc_freq: usize) -> f64 {
    let n = doc_count as f64;
    let df = doc_freq as f64;
    (1.0 + (n - df + 0.5) / (df + 0.5)).log2()
}

/// Saturating term-frequency component, normalized by document length
/// relative to the corpus average. `avg_doc_len` must be nonzero.
pub fn tf_component(params: Bm25Params, occurrences: usize, doc_len: usize, avg_doc_len: f64) -> f64 {
    let f = occurrences as f64;
    f * (1.0 + params.k)
        / (f + params.k * (1.0 - params.b + params.b * doc_len as f64 / avg_doc_len))
}

/// Compute the stored weight idf(t) * tf(t, d) for every (document,
/// occurring term) pair. Query-time scoring is then a pure summation over
/// these weights; a term absent from a document contributes exactly 0, so
/// no entry is written for it.
///
/// `stats` must describe `documents`; an empty corpus is rejected before
/// the formula can divide by its zero average length.
pub fn build_index(
    documents: &[Document],
    stats: &CorpusStats,
    params: Bm25Params,
) -> Result<WeightedIndex, Error> {
    if stats.doc_count == 0 {
        return Err(Error::EmptyCorpus);
    }

    // IDF once per term across the whole corpus.
    let idf_by_term: HashMap<&str, f64> = stats
        .doc_freq
        .iter()
        .map(|(term, &df)| (term.as_str(), idf(stats.doc_count, df)))
        .collect();

    let mut index = BTreeMap::new();
    for doc in documents {
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for term in &doc.terms {
            *occurrences.entry(term.as_str()).or_insert(0) += 1;
        }

        let mut weights = BTreeMap::new();
        for (term, count) in occurrences {
            let tf = tf_component(params, count, doc.len(), stats.avg_doc_len);
            let idf = idf_by_term.get(term).copied().unwrap_or(0.0);
            weights.insert(term.to_string(), idf * tf);
        }
        index.insert(doc.id.clone(), weights);
    }

    Ok(WeightedIndex::from_weights(index))
}
