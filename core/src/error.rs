use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy shared by the indexing, query, and evaluation tools.
#[derive(Debug, Error)]
pub enum Error {
    /// A required file or directory is absent or unreadable.
    #[error("missing resource {}: {source}", path.display())]
    MissingResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A results/qrels/queries line does not have the expected shape.
    #[error("{}:{line}: {reason}", file.display())]
    MalformedLine {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    /// The index artifact is not a well-formed document -> term -> weight
    /// mapping. Loading is strict; there is no partial recovery.
    #[error("malformed index artifact: {0}")]
    MalformedIndex(#[from] serde_json::Error),

    /// Weighting an empty corpus would divide by zero in the BM25 formula.
    #[error("corpus contains no documents")]
    EmptyCorpus,

    /// An output file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
