use anyhow::{bail, Result};
use clap::Parser;
use okapi_core::eval::{evaluate, Metrics};
use okapi_core::persist::{load_qrels, load_results, CorpusPaths, RESULTS_FILE};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// NDCG cutoff reported by the evaluator.
const NDCG_CUTOFF: usize = 15;

#[derive(Parser)]
#[command(name = "okapi-evaluator")]
#[command(about = "Score a results file against relevance judgments", long_about = None)]
struct Cli {
    /// Corpus root path
    #[arg(short, long)]
    path: String,
    /// Results file produced by automatic query mode
    #[arg(long, default_value = RESULTS_FILE)]
    results: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let paths = CorpusPaths::new(&cli.path);
    let mut qrels_path = paths.qrels();
    if !qrels_path.exists() {
        let fallback = PathBuf::from("files").join("qrels.txt");
        tracing::warn!(
            path = %qrels_path.display(),
            fallback = %fallback.display(),
            "qrels not found in corpus, using working-directory copy"
        );
        qrels_path = fallback;
    }

    let qrels = load_qrels(&qrels_path)?;
    let results = load_results(&cli.results)?;
    if results.is_empty() {
        bail!(
            "results file {} contains no queries; run automatic query mode first",
            cli.results.display()
        );
    }

    print_metrics(&evaluate(&results, &qrels, NDCG_CUTOFF));
    Ok(())
}

fn print_metrics(m: &Metrics) {
    println!("Evaluation results:");
    println!("Precision:    {:.3}", m.precision);
    println!("Recall:       {:.3}", m.recall);
    println!("R-precision:  {:.3}", m.r_precision);
    println!("P@10:         {:.3}", m.p_at_10);
    println!("MAP:          {:.3}", m.map);
    println!("NDCG@15:      {:.3}", m.ndcg);
}
