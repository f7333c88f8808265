use anyhow::Result;
use okapi_core::analyzer::Analyzer;
use okapi_core::persist::{load_queries, save_results};
use okapi_core::scorer::{rank_documents, SearchHit, DEFAULT_RESULT_LIMIT};
use okapi_core::WeightedIndex;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

/// Analyze the query text and rank the top documents against the index.
pub fn run_query(index: &WeightedIndex, analyzer: &Analyzer, query: &str) -> Vec<SearchHit> {
    let terms = analyzer.analyze(query);
    rank_documents(index, &terms, DEFAULT_RESULT_LIMIT)
}

/// Interactive mode: one read-eval-print cycle per query. Reads a line,
/// ranks, prints a Rank / Doc ID / Score table, repeats until the sentinel
/// (`QUIT`, case-insensitive) or end of input.
pub fn interactive_mode(
    index: &WeightedIndex,
    analyzer: &Analyzer,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    loop {
        write!(output, "Enter your query (or 'QUIT' to exit): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break; // end of input behaves like the sentinel
        }
        let query = line.trim();
        if query.eq_ignore_ascii_case("QUIT") {
            break;
        }

        let start = Instant::now();
        let results = run_query(index, analyzer, query);
        writeln!(output, "Query completed in {:.4} seconds.", start.elapsed().as_secs_f64())?;

        if results.is_empty() {
            writeln!(output, "No results found.")?;
            continue;
        }
        writeln!(output, "{:<6}{:<25}{}", "Rank", "Doc ID", "Score")?;
        for hit in &results {
            writeln!(output, "{:<6}{:<25}{:.4}", hit.rank, hit.doc_id, hit.score)?;
        }
    }
    Ok(())
}

/// Automatic mode: run every query in the batch file and write the results
/// file consumed by the evaluator.
pub fn automatic_mode(
    index: &WeightedIndex,
    analyzer: &Analyzer,
    queries_path: &Path,
    output_path: &Path,
) -> Result<()> {
    let queries = load_queries(queries_path)?;

    let start = Instant::now();
    let mut results = Vec::with_capacity(queries.len());
    for (query_id, text) in queries {
        let hits = run_query(index, analyzer, &text);
        results.push((query_id, hits));
    }
    let elapsed = start.elapsed().as_secs_f64();

    save_results(output_path, &results)?;
    tracing::info!(
        queries = results.len(),
        elapsed_s = elapsed,
        path = %output_path.display(),
        "automatic mode complete"
    );
    Ok(())
}
