use anyhow::{bail, Context, Result};
use clap::Parser;
use okapi_core::analyzer::Analyzer;
use okapi_core::bm25::{build_index, Bm25Params};
use okapi_core::persist::{save_index, CorpusPaths, INDEX_FILE};
use okapi_core::stats::{aggregate, Document};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "okapi-indexer")]
#[command(about = "Build the BM25 weighted index for a corpus", long_about = None)]
struct Cli {
    /// Corpus root path (contains documents/ and files/)
    #[arg(short, long)]
    path: String,
    /// Directory the index artifact is written to
    #[arg(long, default_value = ".")]
    output: PathBuf,
    /// Term-frequency saturation parameter
    #[arg(long, default_value_t = 1.0)]
    k: f64,
    /// Length-normalization strength
    #[arg(long, default_value_t = 0.75)]
    b: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let paths = CorpusPaths::new(&cli.path);
    let analyzer = Analyzer::for_corpus(&paths)?;

    let documents = read_corpus(&paths, &analyzer)?;
    if documents.is_empty() {
        bail!("no documents found under {}", paths.documents_dir().display());
    }

    let stats = aggregate(&documents);
    tracing::info!(
        docs = stats.doc_count,
        terms = stats.doc_freq.len(),
        avg_doc_len = stats.avg_doc_len,
        "corpus aggregated"
    );

    let index = build_index(&documents, &stats, Bm25Params { k: cli.k, b: cli.b })?;

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let out_file = cli.output.join(INDEX_FILE);
    save_index(&out_file, &index)?;
    tracing::info!(path = %out_file.display(), "index build complete");
    Ok(())
}

/// Walk the corpus documents directory and analyze every file. The file
/// name is the document id.
fn read_corpus(paths: &CorpusPaths, analyzer: &Analyzer) -> Result<Vec<Document>> {
    let docs_dir = paths.documents_dir();
    if !docs_dir.is_dir() {
        bail!("documents directory missing: {}", docs_dir.display());
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(&docs_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        let text = fs::read_to_string(entry.path())
            .with_context(|| format!("reading {}", entry.path().display()))?;
        documents.push(Document::new(name.into_owned(), analyzer.analyze(&text)));
        if documents.len() % 100 == 0 {
            tracing::info!(processed = documents.len(), "processing documents");
        }
    }
    Ok(documents)
}
