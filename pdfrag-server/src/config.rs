//! Command line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pdfrag::ollama::{
    DEFAULT_BASE_URL, DEFAULT_DIMENSIONS, DEFAULT_EMBEDDING_MODEL, DEFAULT_GENERATION_MODEL,
};
use pdfrag::{DEFAULT_COLLECTION, RagConfig};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// The `RUST_LOG` filter, falling back to [`DEFAULT_LOG_FILTER`].
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[derive(Debug, Parser)]
#[command(name = "pdfrag-server")]
#[command(version)]
#[command(about = "Upload PDFs and ask questions about them", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ServerConfig,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Wait for the backing services and serve the HTTP API (default).
    Serve,
    /// Exit 0 once the generation model is installed on Ollama, 1 otherwise.
    CheckModel(CheckModelArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CheckModelArgs {
    #[arg(long, default_value_t = 10)]
    pub attempts: u32,

    #[arg(long, default_value_t = 10)]
    pub interval_secs: u64,
}

impl CheckModelArgs {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Everything the service needs to start.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    #[arg(long, env = "PDFRAG_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PDFRAG_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Qdrant gRPC endpoint.
    #[arg(long, env = "QDRANT_URL", default_value = "http://qdrant:6334")]
    pub qdrant_url: String,

    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_BASE_URL)]
    pub ollama_url: String,

    #[arg(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Must match the output size of the embedding model.
    #[arg(long, env = "EMBEDDING_DIMENSIONS", default_value_t = DEFAULT_DIMENSIONS)]
    pub embedding_dimensions: usize,

    #[arg(long, env = "GENERATION_MODEL", default_value = DEFAULT_GENERATION_MODEL)]
    pub generation_model: String,

    #[arg(long, env = "PDFRAG_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    #[arg(long, env = "CHUNK_SIZE", default_value_t = 500)]
    pub chunk_size: usize,

    #[arg(long, env = "CHUNK_OVERLAP", default_value_t = 50)]
    pub chunk_overlap: usize,

    #[arg(long, env = "TOP_K", default_value_t = 5)]
    pub top_k: usize,

    #[arg(long, env = "SIMILARITY_THRESHOLD", default_value_t = 0.3)]
    pub similarity_threshold: f32,

    #[arg(long, env = "GENERATION_TIMEOUT_SECS", default_value_t = 30)]
    pub generation_timeout_secs: u64,

    #[arg(long, env = "READINESS_ATTEMPTS", default_value_t = 30)]
    pub readiness_attempts: u32,

    #[arg(long, env = "READINESS_INTERVAL_SECS", default_value_t = 2)]
    pub readiness_interval_secs: u64,

    /// Largest accepted upload, in megabytes.
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = 32)]
    pub max_upload_mb: usize,
}

impl ServerConfig {
    /// The pipeline configuration, validated.
    pub fn rag_config(&self) -> pdfrag::Result<RagConfig> {
        RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .similarity_threshold(self.similarity_threshold)
            .generation_timeout_secs(self.generation_timeout_secs)
            .collection(self.collection.clone())
            .build()
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid host/port '{}:{}'", self.host, self.port))
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_secs(self.readiness_interval_secs)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
