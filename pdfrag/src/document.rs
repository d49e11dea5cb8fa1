//! Data types for documents, chunks, search results and answers.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Raw extracted text of one uploaded file.
///
/// Only lives for the duration of an ingestion call; its chunks are what
/// gets stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Name of the uploaded file.
    pub filename: String,
    /// The extracted text content.
    pub text: String,
    /// Ingestion time as Unix seconds.
    pub ingested_at: i64,
}

impl Document {
    /// Create a document stamped with the current time.
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_timestamp(filename, text, Utc::now().timestamp())
    }

    /// Create a document with an explicit ingestion timestamp.
    pub fn with_timestamp(
        filename: impl Into<String>,
        text: impl Into<String>,
        ingested_at: i64,
    ) -> Self {
        Self { filename: filename.into(), text: text.into(), ingested_at }
    }
}

/// A segment of a [`Document`], optionally carrying its vector embedding.
///
/// The embedding is empty until the ingestion pipeline attaches the
/// embedder's output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier (UUID v4) for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// Name of the file the chunk was cut from.
    pub filename: String,
    /// Ingestion time of the parent document as Unix seconds.
    pub timestamp: i64,
    /// The vector embedding for this chunk's text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// The payload persisted next to the vector.
    pub fn payload(&self) -> ChunkPayload {
        ChunkPayload {
            text: self.text.clone(),
            filename: self.filename.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Rebuild a chunk from a stored id and payload. The embedding is left empty.
    pub fn from_payload(id: impl Into<String>, payload: ChunkPayload) -> Self {
        Self {
            id: id.into(),
            text: payload.text,
            filename: payload.filename,
            timestamp: payload.timestamp,
            embedding: Vec::new(),
        }
    }
}

/// Payload schema stored with every point: `{text, archivo, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkPayload {
    /// Chunk text.
    pub text: String,
    /// Source filename.
    #[serde(rename = "archivo")]
    pub filename: String,
    /// Ingestion time as Unix seconds.
    pub timestamp: i64,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// Outcome of ingesting one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestionSummary {
    /// Name of the ingested file.
    pub filename: String,
    /// Number of chunks embedded and stored.
    #[serde(rename = "chunksProcessed")]
    pub chunk_count: usize,
}

/// Answer to one question, with the context it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnswer {
    /// The question as asked.
    pub question: String,
    /// The generated (trimmed) answer.
    pub answer: String,
    /// Retrieved chunk texts, most relevant first.
    pub context: Vec<String>,
    /// Number of retrieved chunks.
    pub result_count: usize,
}
