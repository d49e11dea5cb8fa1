//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] owns the collaborator handles and exposes the two
//! request flows:
//!
//! - [`IngestionPipeline`]: chunk → embed → store
//! - [`QueryPipeline`]: embed → search → prompt → generate
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfrag::{Document, InMemoryVectorStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .generator(Arc::new(my_generator))
//!     .build()?;
//!
//! pipeline.ensure_collection().await?;
//! pipeline.ingest(&Document::new("manual.pdf", text)).await?;
//! let answer = pipeline.ask("How do I reset the device?").await?;
//! ```

mod ingest;
mod query;

use std::sync::Arc;

use tracing::{error, info};

pub use ingest::IngestionPipeline;
pub use query::{NO_RELEVANT_INFORMATION, QueryPipeline, RetrievalSettings};

use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::RagConfig;
use crate::document::{Document, IngestionSummary, QueryAnswer};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::TextGenerator;
use crate::prompt::PromptBuilder;
use crate::vectorstore::VectorStore;

/// The RAG pipeline orchestrator.
///
/// Construct one via [`RagPipeline::builder()`]. The pipeline holds no
/// mutable state of its own; share it behind an `Arc` across requests.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    generator: Arc<dyn TextGenerator>,
    ingestion: IngestionPipeline,
    query: QueryPipeline,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline").field("config", &self.config).finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Return a reference to the text generator.
    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// The ingestion flow.
    pub fn ingestion(&self) -> &IngestionPipeline {
        &self.ingestion
    }

    /// The query flow.
    pub fn query(&self) -> &QueryPipeline {
        &self.query
    }

    /// Create the configured collection if it does not exist yet.
    ///
    /// The collection is created with the dimensionality reported by the
    /// configured [`EmbeddingProvider`]. Idempotent; meant to be called once
    /// by the process bootstrap, not per request.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if the vector store operation fails.
    pub async fn ensure_collection(&self) -> Result<()> {
        let name = &self.config.collection;
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.create_collection(name, dimensions).await.map_err(|e| {
            error!(collection = %name, error = %e, "failed to create collection");
            e.in_stage(&format!("creating collection '{name}'"))
        })?;
        info!(collection = %name, dimensions, "collection ready");
        Ok(())
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// # Errors
    ///
    /// See [`IngestionPipeline::ingest`].
    pub async fn ingest(&self, document: &Document) -> Result<IngestionSummary> {
        self.ingestion.ingest(document).await
    }

    /// Extract the text of a PDF and ingest it.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ExtractionError`] for unreadable PDFs,
    /// [`RagError::EmptyDocument`] when no text could be extracted, and
    /// otherwise everything [`IngestionPipeline::ingest`] returns.
    #[cfg(feature = "pdf")]
    pub async fn ingest_pdf(&self, filename: &str, bytes: &[u8]) -> Result<IngestionSummary> {
        let text = crate::extract::extract_pdf_text(bytes)?;
        if text.trim().is_empty() {
            return Err(RagError::EmptyDocument { filename: filename.to_string() });
        }
        self.ingest(&Document::new(filename, text)).await
    }

    /// Answer a question from the stored documents.
    ///
    /// # Errors
    ///
    /// See [`QueryPipeline::ask`].
    pub async fn ask(&self, question: &str) -> Result<QueryAnswer> {
        self.query.ask(question).await
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedding provider, vector store and generator are required. The
/// configuration defaults to [`RagConfig::default`], the chunker to a
/// [`FixedSizeChunker`] sized from the configuration, and the prompt builder
/// to [`PromptBuilder::default`].
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    generator: Option<Arc<dyn TextGenerator>>,
    chunker: Option<Arc<dyn Chunker>>,
    prompt_builder: Option<PromptBuilder>,
}

impl std::fmt::Debug for RagPipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipelineBuilder").field("config", &self.config).finish_non_exhaustive()
    }
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the text generator.
    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Replace the default fixed-size chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Replace the default prompt builder.
    pub fn prompt_builder(mut self, prompt_builder: PromptBuilder) -> Self {
        self.prompt_builder = Some(prompt_builder);
        self
    }

    /// Build the [`RagPipeline`], validating the configuration and that all
    /// required collaborators are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing or
    /// the configuration is inconsistent.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let generator =
            self.generator.ok_or_else(|| RagError::ConfigError("generator is required".to_string()))?;

        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        let ingestion = IngestionPipeline::new(
            chunker,
            Arc::clone(&embedding_provider),
            Arc::clone(&vector_store),
            config.collection.clone(),
        );

        let query = QueryPipeline::new(
            Arc::clone(&embedding_provider),
            Arc::clone(&vector_store),
            Arc::clone(&generator),
            self.prompt_builder.unwrap_or_default(),
            RetrievalSettings {
                collection: config.collection.clone(),
                top_k: config.top_k,
                similarity_threshold: config.similarity_threshold,
                generation_timeout: config.generation_timeout(),
            },
        );

        Ok(RagPipeline { config, embedding_provider, vector_store, generator, ingestion, query })
    }
}
