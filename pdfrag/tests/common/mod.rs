//! Test doubles for the pipeline's collaborators.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pdfrag::{
    Chunk, EmbeddingProvider, RagError, Result, SearchResult, TextGenerator, VectorStore,
};

/// Deterministic hash-based embeddings that count how often they are called.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    pub dimensions: usize,
    pub fail: bool,
    pub drop_last: bool,
    pub embed_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, ..Default::default() }
    }

    pub fn failing(dimensions: usize) -> Self {
        Self { dimensions, fail: true, ..Default::default() }
    }

    /// Returns one vector fewer than it was asked for.
    pub fn short_batches(dimensions: usize) -> Self {
        Self { dimensions, drop_last: true, ..Default::default() }
    }

    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        emb
    }

    pub fn total_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst) + self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RagError::EmbeddingError {
                provider: "mock".into(),
                message: "model not loaded".into(),
            });
        }
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RagError::EmbeddingError {
                provider: "mock".into(),
                message: "model not loaded".into(),
            });
        }
        let mut vectors: Vec<Vec<f32>> = texts.iter().map(|t| self.vector_for(t)).collect();
        if self.drop_last {
            vectors.pop();
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A store that returns canned search results regardless of the query and
/// threshold, and records upserts.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    pub results: Vec<SearchResult>,
    pub fail: bool,
    pub searches: AtomicUsize,
    pub upserted: Mutex<Vec<Chunk>>,
}

impl ScriptedStore {
    pub fn with_scores(scores: &[f32]) -> Self {
        let results = scores
            .iter()
            .enumerate()
            .map(|(i, score)| SearchResult {
                chunk: Chunk {
                    id: format!("point-{i}"),
                    text: format!("chunk scored {score}"),
                    filename: "manual.pdf".into(),
                    timestamp: 1_700_000_000,
                    embedding: Vec::new(),
                },
                score: *score,
            })
            .collect();
        Self { results, ..Default::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(RagError::VectorStoreError {
                backend: "scripted".into(),
                message: "connection refused".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn create_collection(&self, _name: &str, _dimensions: usize) -> Result<()> {
        self.check()
    }

    async fn upsert(&self, _collection: &str, chunks: &[Chunk]) -> Result<()> {
        self.check()?;
        self.upserted.lock().unwrap().extend_from_slice(chunks);
        Ok(())
    }

    async fn search(
        &self,
        _collection: &str,
        _embedding: &[f32],
        top_k: usize,
        _score_threshold: Option<f32>,
    ) -> Result<Vec<SearchResult>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.results.iter().take(top_k).cloned().collect())
    }

    async fn count(&self, _collection: &str) -> Result<u64> {
        self.check()?;
        Ok(self.upserted.lock().unwrap().len() as u64)
    }
}

/// A generator that records prompts and replies with a fixed text.
#[derive(Debug, Default)]
pub struct MockGenerator {
    pub reply: String,
    pub delay: Option<Duration>,
    pub fail: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn replying(reply: &str) -> Self {
        Self { reply: reply.to_string(), ..Default::default() }
    }

    pub fn slow(delay: Duration) -> Self {
        Self { reply: "too late".into(), delay: Some(delay), ..Default::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(RagError::GenerationError {
                provider: "mock".into(),
                message: "API returned 500 Internal Server Error".into(),
            });
        }
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
