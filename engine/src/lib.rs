//! Small ranked-retrieval engine: tf-idf weighting over a tokenized corpus,
//! cosine-similarity ranking with a fixed top-10 cut, and a portable JSON
//! snapshot format so a built index can be reused without re-tokenizing.
//!
//! Build an index by feeding documents through [`Engine::ingest_document`],
//! finalize it once with [`Engine::compute_weights`], then answer queries
//! with [`Engine::process_query`]. [`persist::save_snapshot`] and
//! [`persist::load_snapshot`] substitute for ingestion and weighting on
//! later runs.

pub mod engine;
pub mod error;
pub mod persist;
pub mod rank;
pub mod store;
pub mod tokenizer;

pub use engine::{Engine, IndexState};
pub use error::EngineError;
pub use persist::Snapshot;
pub use rank::{SearchHit, TOP_K};
pub use store::{DocumentVector, FrequencyStore, VocabularySkew};
pub use tokenizer::{MarkupExtractor, Tokenizer};
