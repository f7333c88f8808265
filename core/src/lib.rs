pub mod analyzer;
pub mod bm25;
pub mod error;
pub mod eval;
pub mod index;
pub mod persist;
pub mod scorer;
pub mod stats;

pub use analyzer::Analyzer;
pub use bm25::Bm25Params;
pub use error::Error;
pub use index::WeightedIndex;
pub use scorer::{SearchHit, DEFAULT_RESULT_LIMIT};
pub use stats::{aggregate, CorpusStats, Document};
