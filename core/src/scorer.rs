use crate::index::WeightedIndex;
use std::cmp::Ordering;

/// Queries return at most this many documents.
pub const DEFAULT_RESULT_LIMIT: usize = 15;

/// One retrieved document: 1-based contiguous rank and BM25 score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: String,
    pub rank: usize,
    pub score: f64,
}

/// Score every document against the query terms and keep the best `limit`.
///
/// A document's score is the sum of its stored weights over the query term
/// sequence; a repeated query term adds its weight once per occurrence, and
/// a term absent from the document adds exactly 0. Documents scoring 0 are
/// excluded rather than returned. Ordering is score descending with doc id
/// ascending as the tie-break, so rankings are reproducible.
pub fn rank_documents(index: &WeightedIndex, query_terms: &[String], limit: usize) -> Vec<SearchHit> {
    let mut scored: Vec<(&str, f64)> = Vec::new();
    for (doc_id, weights) in index.documents() {
        let score: f64 = query_terms
            .iter()
            .map(|term| weights.get(term).copied().unwrap_or(0.0))
            .sum();
        if score > 0.0 {
            scored.push((doc_id.as_str(), score));
        }
    }

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    scored.truncate(limit);

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (doc_id, score))| SearchHit {
            doc_id: doc_id.to_string(),
            rank: i + 1,
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bm25::{build_index, Bm25Params};
    use crate::stats::{aggregate, Document};
    use std::collections::BTreeMap;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn two_doc_index() -> WeightedIndex {
        let docs = vec![
            Document::new("doc1", terms(&["cat", "dog", "cat"])),
            Document::new("doc2", terms(&["dog", "bird"])),
        ];
        let stats = aggregate(&docs);
        build_index(&docs, &stats, Bm25Params::default()).unwrap()
    }

    #[test]
    fn zero_score_documents_are_excluded() {
        let index = two_doc_index();
        let hits = rank_documents(&index, &terms(&["cat"]), DEFAULT_RESULT_LIMIT);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_id, "doc1");
        assert_eq!(hits[0].rank, 1);
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn repeated_query_terms_add_their_weight_again() {
        let index = two_doc_index();
        let once = rank_documents(&index, &terms(&["cat"]), DEFAULT_RESULT_LIMIT);
        let twice = rank_documents(&index, &terms(&["cat", "cat"]), DEFAULT_RESULT_LIMIT);
        assert!((twice[0].score - 2.0 * once[0].score).abs() < 1e-12);
    }

    #[test]
    fn results_are_sorted_truncated_and_contiguously_ranked() {
        let mut weights = BTreeMap::new();
        for i in 0..20 {
            let mut doc = BTreeMap::new();
            doc.insert("term".to_string(), (i + 1) as f64);
            weights.insert(format!("d{i:02}"), doc);
        }
        let index = WeightedIndex::from_weights(weights);

        let hits = rank_documents(&index, &terms(&["term"]), DEFAULT_RESULT_LIMIT);
        assert_eq!(hits.len(), DEFAULT_RESULT_LIMIT);
        assert_eq!(hits[0].doc_id, "d19");
        for (i, hit) in hits.iter().enumerate() {
            assert_eq!(hit.rank, i + 1);
            if i > 0 {
                assert!(hit.score <= hits[i - 1].score);
            }
        }
    }

    #[test]
    fn ties_break_by_ascending_doc_id() {
        let mut weights = BTreeMap::new();
        for id in ["zeta", "alpha", "mid"] {
            let mut doc = BTreeMap::new();
            doc.insert("term".to_string(), 1.5);
            weights.insert(id.to_string(), doc);
        }
        let index = WeightedIndex::from_weights(weights);

        let hits = rank_documents(&index, &terms(&["term"]), DEFAULT_RESULT_LIMIT);
        let ids: Vec<&str> = hits.iter().map(|h| h.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn unknown_query_terms_return_nothing() {
        let index = two_doc_index();
        let hits = rank_documents(&index, &terms(&["unicorn"]), DEFAULT_RESULT_LIMIT);
        assert!(hits.is_empty());
    }
}
