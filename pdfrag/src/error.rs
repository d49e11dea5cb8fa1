//! Error types for the `pdfrag` crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while ingesting documents or answering questions.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid chunking or retrieval parameters. Fatal at startup.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The document produced no chunk with usable text.
    #[error("No usable text could be extracted from '{filename}'")]
    EmptyDocument {
        /// Name of the file that was being ingested.
        filename: String,
    },

    /// The question was empty after trimming whitespace.
    #[error("The question must not be empty")]
    BlankQuery,

    /// The PDF could not be parsed.
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The text generator failed or returned an unusable response.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The text generator did not answer within the bounded wait.
    #[error("Generation timed out after {seconds}s")]
    GenerationTimeout {
        /// The bound that was exceeded, in seconds.
        seconds: u64,
    },
}

impl RagError {
    /// Prefix the failing stage to a collaborator error, keeping its kind.
    ///
    /// Errors that are not produced by a collaborator are returned unchanged.
    pub fn in_stage(self, stage: &str) -> Self {
        match self {
            Self::EmbeddingError { provider, message } => {
                Self::EmbeddingError { provider, message: format!("{stage}: {message}") }
            }
            Self::VectorStoreError { backend, message } => {
                Self::VectorStoreError { backend, message: format!("{stage}: {message}") }
            }
            Self::GenerationError { provider, message } => {
                Self::GenerationError { provider, message: format!("{stage}: {message}") }
            }
            other => other,
        }
    }

    /// A generation timeout for `bound`, rounded up to whole seconds.
    pub fn generation_timeout(bound: Duration) -> Self {
        let seconds = bound.as_secs() + u64::from(bound.subsec_nanos() > 0);
        Self::GenerationTimeout { seconds }
    }

    /// Whether the error was caused by the caller's input rather than by the
    /// service or one of its collaborators.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyDocument { .. } | Self::BlankQuery | Self::ExtractionError(_))
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
