use thiserror::Error;

/// Errors surfaced by the retrieval engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A query ran before the one-time weighting pass.
    #[error("index weights have not been computed yet")]
    NotWeighted,
    /// A second weighting pass, or ingestion into a finalized index.
    #[error("index weights are already finalized")]
    AlreadyWeighted,
    #[error("markup extraction failed: {0}")]
    Markup(String),
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The snapshot is missing a required field or has the wrong shape. No
    /// partial state is adopted.
    #[error("malformed snapshot: {0}")]
    Deserialization(#[source] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
