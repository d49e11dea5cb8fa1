//! Question answering: embed → search → prompt → generate.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::document::{QueryAnswer, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::TextGenerator;
use crate::prompt::PromptBuilder;
use crate::vectorstore::VectorStore;

/// Answer returned when no chunk clears the similarity threshold.
pub const NO_RELEVANT_INFORMATION: &str =
    "No relevant information was found in the uploaded documents.";

/// Retrieval parameters for [`QueryPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalSettings {
    /// Collection to search.
    pub collection: String,
    /// Maximum number of chunks to retrieve.
    pub top_k: usize,
    /// Minimum similarity a chunk needs to be used as context.
    pub similarity_threshold: f32,
    /// Upper bound on the generator call.
    pub generation_timeout: Duration,
}

/// Answers questions from the stored chunks.
pub struct QueryPipeline {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    generator: Arc<dyn TextGenerator>,
    prompt_builder: PromptBuilder,
    settings: RetrievalSettings,
}

impl std::fmt::Debug for QueryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("settings", &self.settings)
            .field("generator", &self.generator.model())
            .finish_non_exhaustive()
    }
}

impl QueryPipeline {
    /// Create a query pipeline.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        generator: Arc<dyn TextGenerator>,
        prompt_builder: PromptBuilder,
        settings: RetrievalSettings,
    ) -> Self {
        Self { embedding_provider, vector_store, generator, prompt_builder, settings }
    }

    /// The retrieval parameters in use.
    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    /// Retrieve the chunks relevant to a question, most similar first.
    ///
    /// Results scoring below the threshold are dropped even if the store
    /// returned them.
    ///
    /// # Errors
    ///
    /// - [`RagError::BlankQuery`] if the question is blank; nothing is called.
    /// - [`RagError::EmbeddingError`] / [`RagError::VectorStoreError`] if a
    ///   collaborator fails.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        if question.trim().is_empty() {
            return Err(RagError::BlankQuery);
        }

        let query_embedding = self.embedding_provider.embed(question).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            e.in_stage("embedding question")
        })?;

        let threshold = self.settings.similarity_threshold;
        let collection = &self.settings.collection;
        let results = self
            .vector_store
            .search(collection, &query_embedding, self.settings.top_k, Some(threshold))
            .await
            .map_err(|e| {
                error!(collection = %collection, error = %e, "vector store search failed");
                e.in_stage(&format!("searching collection '{collection}'"))
            })?;

        Ok(results.into_iter().filter(|r| r.score >= threshold).collect())
    }

    /// Answer a question from the retrieved context.
    ///
    /// When nothing relevant is retrieved the generator is not called and the
    /// answer is [`NO_RELEVANT_INFORMATION`] with an empty context.
    ///
    /// # Errors
    ///
    /// Everything [`retrieve`](Self::retrieve) returns, plus
    /// [`RagError::GenerationError`] and [`RagError::GenerationTimeout`] when
    /// the generator fails or exceeds the bounded wait.
    pub async fn ask(&self, question: &str) -> Result<QueryAnswer> {
        let results = self.retrieve(question).await?;

        if results.is_empty() {
            info!(result_count = 0, "no relevant context, skipping generation");
            return Ok(QueryAnswer {
                question: question.to_string(),
                answer: NO_RELEVANT_INFORMATION.to_string(),
                context: Vec::new(),
                result_count: 0,
            });
        }

        let context: Vec<String> = results.into_iter().map(|r| r.chunk.text).collect();
        let prompt = self.prompt_builder.build(&context, question);

        let timeout = self.settings.generation_timeout;
        let completion = tokio::time::timeout(timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| {
                error!(timeout_secs = timeout.as_secs(), "generation timed out");
                RagError::generation_timeout(timeout)
            })?
            .map_err(|e| {
                error!(error = %e, "generation failed");
                e.in_stage("generating answer")
            })?;

        let result_count = context.len();
        info!(result_count, "query completed");

        Ok(QueryAnswer {
            question: question.to_string(),
            answer: completion.trim().to_string(),
            context,
            result_count,
        })
    }
}
