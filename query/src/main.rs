use anyhow::Result;
use clap::{Parser, ValueEnum};
use okapi_core::analyzer::Analyzer;
use okapi_core::persist::{load_index, CorpusPaths, INDEX_FILE, RESULTS_FILE};
use okapi_query::{automatic_mode, interactive_mode};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Interactive,
    Automatic,
}

#[derive(Parser)]
#[command(name = "okapi-query")]
#[command(about = "Run BM25 queries against a persisted index", long_about = None)]
struct Cli {
    /// Mode of operation
    #[arg(short, long, value_enum)]
    mode: Mode,
    /// Corpus root path
    #[arg(short, long)]
    path: String,
    /// Index artifact to load
    #[arg(long, default_value = INDEX_FILE)]
    index: PathBuf,
    /// Results file written in automatic mode
    #[arg(long, default_value = RESULTS_FILE)]
    output: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let start = Instant::now();
    let index = load_index(&cli.index)?;
    tracing::info!(
        docs = index.doc_count(),
        elapsed_s = start.elapsed().as_secs_f64(),
        "index loaded"
    );

    let paths = CorpusPaths::new(&cli.path);
    let analyzer = Analyzer::for_corpus(&paths)?;

    match cli.mode {
        Mode::Interactive => {
            let stdin = io::stdin();
            interactive_mode(&index, &analyzer, &mut stdin.lock(), &mut io::stdout())
        }
        Mode::Automatic => automatic_mode(&index, &analyzer, &paths.queries(), &cli.output),
    }
}
