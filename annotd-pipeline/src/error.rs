//! Error types for pipeline construction and annotation

use thiserror::Error;

/// Error type for pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid pipeline configuration
    #[error("invalid pipeline configuration: {0}")]
    Configuration(String),

    /// Unknown annotator name in the `annotators` property
    #[error("unknown annotator: {0}")]
    UnknownAnnotator(String),

    /// An annotator listed before one of its requirements
    #[error("annotator '{later}' requires '{earlier}' earlier in the pipeline")]
    MissingRequirement {
        /// The annotator that must run first
        earlier: &'static str,
        /// The annotator that depends on it
        later: &'static str,
    },

    /// Input that cannot be annotated
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
