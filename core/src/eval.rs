use crate::scorer::SearchHit;
use std::collections::HashMap;

/// Relevance judgments: query id -> document id -> grade. A document
/// present with grade 0 was judged irrelevant; a document absent from the
/// map was never judged. The two are not equivalent.
pub type Qrels = HashMap<String, HashMap<String, u32>>;

/// Retrieved results per query, in rank order.
pub type ResultsByQuery = HashMap<String, Vec<SearchHit>>;

/// The six ranking-quality metrics, macro-averaged over queries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub r_precision: f64,
    pub p_at_10: f64,
    pub map: f64,
    pub ndcg: f64,
}

/// Sentinel grade for a retrieved document that was never judged. Keeps the
/// grade vector aligned with the retrieved list; never counts as relevant
/// and contributes zero gain.
const UNJUDGED: i64 = -1;

/// Align the retrieved list with its judged grades.
fn aligned_grades(retrieved: &[SearchHit], judged: &HashMap<String, u32>) -> Vec<i64> {
    retrieved
        .iter()
        .map(|hit| judged.get(&hit.doc_id).map(|&g| g as i64).unwrap_or(UNJUDGED))
        .collect()
}

/// |Rel|: judged documents with grade > 0.
fn relevant_total(judged: &HashMap<String, u32>) -> usize {
    judged.values().filter(|&&grade| grade > 0).count()
}

fn relevant_in(grades: &[i64]) -> usize {
    grades.iter().filter(|&&grade| grade > 0).count()
}

/// |Ret ∩ Rel| / |Ret|; 0 when nothing was retrieved.
fn precision(grades: &[i64]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }
    relevant_in(grades) as f64 / grades.len() as f64
}

/// |Ret ∩ Rel| / |Rel|; 0 when the query has no relevant documents.
fn recall(grades: &[i64], rel_total: usize) -> f64 {
    if rel_total == 0 {
        return 0.0;
    }
    relevant_in(grades) as f64 / rel_total as f64
}

/// Precision over the top min(cutoff, |Ret|) ranks.
fn precision_at(grades: &[i64], cutoff: usize) -> f64 {
    let at_n = cutoff.min(grades.len());
    if at_n == 0 {
        return 0.0;
    }
    relevant_in(&grades[..at_n]) as f64 / at_n as f64
}

/// Precision over the top R = min(|Rel|, |Ret|) ranks.
fn r_precision(grades: &[i64], rel_total: usize) -> f64 {
    let r = rel_total.min(grades.len());
    if r == 0 {
        return 0.0;
    }
    relevant_in(&grades[..r]) as f64 / r as f64
}

/// Average precision: precision@i accumulated at each 1-based rank i that
/// holds a relevant document, divided by |Rel|.
fn average_precision(grades: &[i64], rel_total: usize) -> f64 {
    if rel_total == 0 {
        return 0.0;
    }
    let mut found = 0usize;
    let mut sum = 0.0;
    for (i, &grade) in grades.iter().enumerate() {
        if grade > 0 {
            found += 1;
            sum += found as f64 / (i + 1) as f64;
        }
    }
    sum / rel_total as f64
}

/// Running cumulative gain: the head position is undiscounted, every later
/// position p divides its gain by log2(p + 1). Unjudged grades clamp to 0.
fn cumulative_gain(grades: impl Iterator<Item = i64>) -> Vec<f64> {
    let mut running = 0.0;
    let mut out = Vec::new();
    for (p, grade) in grades.enumerate() {
        let gain = grade.max(0) as f64;
        running += if p == 0 { gain } else { gain / ((p + 1) as f64).log2() };
        out.push(running);
    }
    out
}

/// NDCG@n with k = min(n, |Ret|). The ideal ranking is the query's full
/// judged set sorted by grade descending (doc id ascending on ties);
/// unjudged documents never appear in it. 0 when the ideal DCG is 0.
fn ndcg_at(grades: &[i64], judged: &HashMap<String, u32>, n: usize) -> f64 {
    if grades.is_empty() || n == 0 {
        return 0.0;
    }
    let k = n.min(grades.len());
    let dcg = cumulative_gain(grades.iter().copied());

    let mut ideal: Vec<(&str, u32)> = judged.iter().map(|(d, &g)| (d.as_str(), g)).collect();
    ideal.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let idcg = cumulative_gain(ideal.iter().map(|&(_, g)| g as i64));
    if idcg.is_empty() {
        return 0.0;
    }

    let ideal_at_k = idcg[k.min(idcg.len()) - 1];
    if ideal_at_k == 0.0 {
        return 0.0;
    }
    dcg[k - 1] / ideal_at_k
}

/// Macro-average all six metrics over every query in the results table.
///
/// A query absent from the qrels is treated as having an empty judgment
/// map. Queries that would divide by zero (nothing retrieved, nothing
/// relevant, ideal DCG of 0) contribute 0 to the affected metric; the
/// denominator stays the number of queries in the results table.
pub fn evaluate(results: &ResultsByQuery, qrels: &Qrels, ndcg_cutoff: usize) -> Metrics {
    if results.is_empty() {
        return Metrics::default();
    }

    let unjudged_query = HashMap::new();
    let mut totals = Metrics::default();
    for (query_id, retrieved) in results {
        let judged = qrels.get(query_id).unwrap_or(&unjudged_query);
        let grades = aligned_grades(retrieved, judged);
        let rel_total = relevant_total(judged);

        let ap = average_precision(&grades, rel_total);
        let ndcg = ndcg_at(&grades, judged, ndcg_cutoff);
        tracing::debug!(%query_id, retrieved = grades.len(), relevant = rel_total, ap, ndcg, "query scored");

        totals.precision += precision(&grades);
        totals.recall += recall(&grades, rel_total);
        totals.r_precision += r_precision(&grades, rel_total);
        totals.p_at_10 += precision_at(&grades, 10);
        totals.map += ap;
        totals.ndcg += ndcg;
    }

    let n = results.len() as f64;
    Metrics {
        precision: totals.precision / n,
        recall: totals.recall / n,
        r_precision: totals.r_precision / n,
        p_at_10: totals.p_at_10 / n,
        map: totals.map / n,
        ndcg: totals.ndcg / n,
    }
}
