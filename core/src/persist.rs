use crate::error::Error;
use crate::index::WeightedIndex;
use crate::scorer::SearchHit;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the persisted index artifact.
pub const INDEX_FILE: &str = "index.json";
/// Default file name of the automatic-mode results file.
pub const RESULTS_FILE: &str = "okapi.results";

/// Well-known locations inside a corpus root directory.
pub struct CorpusPaths {
    pub root: PathBuf,
}

impl CorpusPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.root.join("documents")
    }

    pub fn stopwords(&self) -> PathBuf {
        self.root.join("files").join("stopwords.txt")
    }

    pub fn queries(&self) -> PathBuf {
        self.root.join("files").join("queries.txt")
    }

    pub fn qrels(&self) -> PathBuf {
        self.root.join("files").join("qrels.txt")
    }
}

fn missing(path: &Path, source: std::io::Error) -> Error {
    Error::MissingResource { path: path.to_path_buf(), source }
}

fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedLine { file: path.to_path_buf(), line, reason: reason.into() }
}

/// Serialize the index to a pretty-printed JSON object. BTreeMap ordering
/// keeps both key levels sorted, so rebuilding the same corpus rewrites an
/// identical artifact.
pub fn save_index(path: &Path, index: &WeightedIndex) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(index)?;
    fs::write(path, json).map_err(|source| Error::Write { path: path.to_path_buf(), source })
}

/// Load the index artifact. Parsing is strict: anything that is not a
/// well-formed document -> term -> weight object fails.
pub fn load_index(path: &Path) -> Result<WeightedIndex, Error> {
    let json = fs::read_to_string(path).map_err(|e| missing(path, e))?;
    let index = serde_json::from_str(&json)?;
    Ok(index)
}

/// One stopword per line; blank lines ignored.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>, Error> {
    let file = File::open(path).map_err(|e| missing(path, e))?;
    let mut words = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| missing(path, e))?;
        let word = line.trim();
        if !word.is_empty() {
            words.insert(word.to_string());
        }
    }
    Ok(words)
}

/// Query batch file: `queryId queryText` per line, split on the first space
/// only (the query text may itself contain spaces).
pub fn load_queries(path: &Path) -> Result<Vec<(String, String)>, Error> {
    let file = File::open(path).map_err(|e| missing(path, e))?;
    let mut queries = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| missing(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once(' ') {
            Some((id, text)) => queries.push((id.to_string(), text.to_string())),
            None => return Err(malformed(path, idx + 1, "expected `queryId queryText`")),
        }
    }
    Ok(queries)
}

/// Relevance judgments: `queryId <ignored> documentId grade` per line,
/// grade a non-negative integer. A grade of 0 means judged-and-irrelevant,
/// which evaluation treats differently from never-judged.
pub fn load_qrels(path: &Path) -> Result<HashMap<String, HashMap<String, u32>>, Error> {
    let file = File::open(path).map_err(|e| missing(path, e))?;
    let mut qrels: HashMap<String, HashMap<String, u32>> = HashMap::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| missing(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        let &[query_id, _, doc_id, grade] = cols.as_slice() else {
            return Err(malformed(path, idx + 1, "expected `queryId run documentId grade`"));
        };
        let grade: u32 = grade
            .parse()
            .map_err(|_| malformed(path, idx + 1, format!("grade is not a non-negative integer: {grade}")))?;
        qrels
            .entry(query_id.to_string())
            .or_default()
            .insert(doc_id.to_string(), grade);
    }
    Ok(qrels)
}

/// Results file: `queryId documentId rank score` per line. Lines are
/// grouped per query in file order.
pub fn load_results(path: &Path) -> Result<HashMap<String, Vec<SearchHit>>, Error> {
    let file = File::open(path).map_err(|e| missing(path, e))?;
    let mut results: HashMap<String, Vec<SearchHit>> = HashMap::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| missing(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        let &[query_id, doc_id, rank, score] = cols.as_slice() else {
            return Err(malformed(path, idx + 1, "expected `queryId documentId rank score`"));
        };
        let rank: usize = rank
            .parse()
            .map_err(|_| malformed(path, idx + 1, format!("rank is not an integer: {rank}")))?;
        let score: f64 = score
            .parse()
            .map_err(|_| malformed(path, idx + 1, format!("score is not a number: {score}")))?;
        results
            .entry(query_id.to_string())
            .or_default()
            .push(SearchHit { doc_id: doc_id.to_string(), rank, score });
    }
    Ok(results)
}

/// Write the results file consumed by the evaluator: one line per retrieved
/// document, scores to 4 decimal places.
pub fn save_results(path: &Path, results: &[(String, Vec<SearchHit>)]) -> Result<(), Error> {
    let write_err = |source| Error::Write { path: path.to_path_buf(), source };
    let file = File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    for (query_id, hits) in results {
        for hit in hits {
            writeln!(out, "{} {} {} {:.4}", query_id, hit.doc_id, hit.rank, hit.score)
                .map_err(write_err)?;
        }
    }
    out.flush().map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bm25::{build_index, Bm25Params};
    use crate::stats::{aggregate, Document};
    use tempfile::tempdir;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn index_round_trips_exactly() {
        let docs = vec![
            Document::new("doc1", terms(&["cat", "dog", "cat"])),
            Document::new("doc2", terms(&["dog", "bird"])),
        ];
        let stats = aggregate(&docs);
        let index = build_index(&docs, &stats, Bm25Params::default()).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join(INDEX_FILE);
        save_index(&path, &index).unwrap();
        let reloaded = load_index(&path).unwrap();
        assert_eq!(index, reloaded);
    }

    #[test]
    fn malformed_index_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(INDEX_FILE);
        fs::write(&path, "{ \"doc1\": { \"cat\": ").unwrap();
        assert!(matches!(load_index(&path).unwrap_err(), Error::MalformedIndex(_)));
    }

    #[test]
    fn missing_index_reports_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = load_index(&path).unwrap_err();
        assert!(matches!(err, Error::MissingResource { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn parses_qrels_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("qrels.txt");
        fs::write(&path, "1 0 d1 3\n1 0 d2 0\n2 0 d1 1\n").unwrap();
        let qrels = load_qrels(&path).unwrap();
        assert_eq!(qrels["1"]["d1"], 3);
        assert_eq!(qrels["1"]["d2"], 0);
        assert_eq!(qrels["2"]["d1"], 1);
    }

    #[test]
    fn rejects_short_qrels_line_with_location() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("qrels.txt");
        fs::write(&path, "1 0 d1 3\n1 d2 0\n").unwrap();
        let err = load_qrels(&path).unwrap_err();
        match err {
            Error::MalformedLine { line, .. } => assert_eq!(line, 2),
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn queries_split_on_first_space_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queries.txt");
        fs::write(&path, "12 what similarity laws must be obeyed\n").unwrap();
        let queries = load_queries(&path).unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].0, "12");
        assert_eq!(queries[0].1, "what similarity laws must be obeyed");
    }

    #[test]
    fn results_round_trip_preserves_order_and_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RESULTS_FILE);
        let results = vec![(
            "1".to_string(),
            vec![
                SearchHit { doc_id: "d2".into(), rank: 1, score: 1.25 },
                SearchHit { doc_id: "d1".into(), rank: 2, score: 0.5 },
            ],
        )];
        save_results(&path, &results).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "1 d2 1 1.2500\n1 d1 2 0.5000\n");

        let loaded = load_results(&path).unwrap();
        assert_eq!(loaded["1"].len(), 2);
        assert_eq!(loaded["1"][0].doc_id, "d2");
        assert_eq!(loaded["1"][1].rank, 2);
    }
}
