//! Document ingestion: chunk → embed → store.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chunking::Chunker;
use crate::document::{Chunk, Document, IngestionSummary};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Turns one document into stored, embedded chunks.
///
/// Ingestion is additive: every call writes new points with fresh ids, so
/// ingesting the same document twice stores its chunks twice.
pub struct IngestionPipeline {
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline").field("collection", &self.collection).finish()
    }
}

impl IngestionPipeline {
    /// Create an ingestion pipeline writing into `collection`.
    pub fn new(
        chunker: Arc<dyn Chunker>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self { chunker, embedding_provider, vector_store, collection: collection.into() }
    }

    /// The collection chunks are written to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Ingest a single document.
    ///
    /// All chunk texts are embedded in one batch and all points are upserted
    /// in one call. Nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyDocument`] if chunking produced no usable chunk;
    ///   no collaborator is called in that case.
    /// - [`RagError::EmbeddingError`] / [`RagError::VectorStoreError`] if a
    ///   collaborator fails, with the failing stage in the message.
    pub async fn ingest(&self, document: &Document) -> Result<IngestionSummary> {
        let windows = self.chunker.split(&document.text);
        if windows.is_empty() {
            warn!(filename = %document.filename, "document has no usable text");
            return Err(RagError::EmptyDocument { filename: document.filename.clone() });
        }

        let texts: Vec<&str> = windows.iter().map(|w| w.text).collect();

        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(filename = %document.filename, error = %e, "embedding failed during ingestion");
            e.in_stage(&format!("embedding chunks of '{}'", document.filename))
        })?;

        if embeddings.len() != texts.len() {
            error!(
                filename = %document.filename,
                expected = texts.len(),
                actual = embeddings.len(),
                "embedding count mismatch"
            );
            return Err(RagError::EmbeddingError {
                provider: self.embedding_provider.name().to_string(),
                message: format!(
                    "embedding chunks of '{}': expected {} vectors, got {}",
                    document.filename,
                    texts.len(),
                    embeddings.len()
                ),
            });
        }

        let chunks: Vec<Chunk> = texts
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| Chunk {
                id: Uuid::new_v4().to_string(),
                text: text.to_string(),
                filename: document.filename.clone(),
                timestamp: document.ingested_at,
                embedding,
            })
            .collect();

        self.vector_store.upsert(&self.collection, &chunks).await.map_err(|e| {
            error!(filename = %document.filename, error = %e, "upsert failed during ingestion");
            e.in_stage(&format!("storing chunks of '{}'", document.filename))
        })?;

        let chunk_count = chunks.len();
        info!(filename = %document.filename, chunk_count, "ingested document");

        Ok(IngestionSummary { filename: document.filename.clone(), chunk_count })
    }
}
