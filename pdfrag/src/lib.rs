//! # pdfrag
//!
//! Retrieval-augmented question answering over uploaded PDF documents.
//!
//! Documents are split into overlapping character windows, embedded, and
//! stored in a vector index. Questions are embedded, matched against the
//! index, and answered by a text generator grounded on the retrieved chunks.
//!
//! The embedding model, the vector index and the generator sit behind the
//! [`EmbeddingProvider`], [`VectorStore`] and [`TextGenerator`] traits:
//!
//! | Feature  | Provides                                                  |
//! |----------|-----------------------------------------------------------|
//! | `ollama` | [`ollama::OllamaEmbeddingProvider`], [`ollama::OllamaGenerator`] |
//! | `qdrant` | [`qdrant::QdrantVectorStore`]                             |
//! | `pdf`    | [`extract::extract_pdf_text`], [`RagPipeline::ingest_pdf`] |
//!
//! [`InMemoryVectorStore`] is always available.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
pub mod pipeline;
pub mod prompt;
pub mod vectorstore;

#[cfg(feature = "pdf")]
pub mod extract;
#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use chunking::{Chunker, FixedSizeChunker, TextWindow};
pub use config::{DEFAULT_COLLECTION, RagConfig, RagConfigBuilder};
pub use document::{Chunk, ChunkPayload, Document, IngestionSummary, QueryAnswer, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::TextGenerator;
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{
    IngestionPipeline, NO_RELEVANT_INFORMATION, QueryPipeline, RagPipeline, RagPipelineBuilder,
    RetrievalSettings,
};
pub use prompt::PromptBuilder;
pub use vectorstore::VectorStore;
