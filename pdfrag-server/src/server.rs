//! HTTP routes, handlers and server bootstrap.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use pdfrag::ollama::{OllamaClient, OllamaEmbeddingProvider, OllamaGenerator};
use pdfrag::qdrant::QdrantVectorStore;
use pdfrag::{QueryAnswer, RagPipeline};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::health::{self, HealthReport};
use crate::readiness::wait_until_ready;

const DEFAULT_UPLOAD_LIMIT: usize = 32 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
    pub upload_limit: usize,
}

impl AppState {
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline, upload_limit: DEFAULT_UPLOAD_LIMIT }
    }

    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.upload_limit = bytes;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub chunks_processed: usize,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub question: String,
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let upload_limit = state.upload_limit;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/upload-pdf", post(upload_pdf).layer(DefaultBodyLimit::max(upload_limit)))
        .route("/query", post(query))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Wire the Ollama and Qdrant backed pipeline described by `config`.
pub fn build_pipeline(config: &ServerConfig) -> anyhow::Result<RagPipeline> {
    let rag_config = config.rag_config()?;
    let ollama = OllamaClient::new(config.ollama_url.clone());

    let embedder = OllamaEmbeddingProvider::new(ollama.clone())
        .with_model(config.embedding_model.clone(), config.embedding_dimensions);
    let generator = OllamaGenerator::new(ollama)
        .with_model(config.generation_model.clone())
        .with_timeout(rag_config.generation_timeout());
    let store = QdrantVectorStore::new(&config.qdrant_url)
        .with_context(|| format!("invalid Qdrant url '{}'", config.qdrant_url))?;

    Ok(RagPipeline::builder()
        .config(rag_config)
        .embedding_provider(Arc::new(embedder))
        .vector_store(Arc::new(store))
        .generator(Arc::new(generator))
        .build()?)
}

/// Wait for Qdrant and Ollama, make sure the collection exists, then serve
/// until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let pipeline = Arc::new(build_pipeline(&config)?);

    let attempts = config.readiness_attempts;
    let interval = config.readiness_interval();

    // Collection creation doubles as the Qdrant readiness check.
    wait_until_ready("qdrant", attempts, interval, || pipeline.ensure_collection()).await?;

    if let Err(e) =
        wait_until_ready("ollama", attempts, interval, || pipeline.generator().list_models()).await
    {
        warn!(error = %e, "starting without Ollama; queries will fail until it is reachable");
    }

    let app = app_router(AppState::new(pipeline).with_upload_limit(config.max_upload_bytes()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("pdfrag listening on http://{}", addr);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "PDF RAG API with Qdrant and Ollama",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload_pdf": "/upload-pdf",
            "query": "/query",
            "health": "/health"
        }
    }))
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(health::check(&state.pipeline).await)
}

async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.ends_with(".pdf") {
            return Err(ApiError::UnsupportedFile(filename));
        }

        let bytes = field.bytes().await?;
        let summary = state.pipeline.ingest_pdf(&filename, &bytes).await?;

        return Ok(Json(UploadResponse {
            message: format!(
                "{} chunks from '{}' stored successfully.",
                summary.chunk_count, summary.filename
            ),
            filename: summary.filename,
            chunks_processed: summary.chunk_count,
        }));
    }

    Err(ApiError::BadRequest("missing multipart field 'file'".to_string()))
}

async fn query(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryAnswer>, ApiError> {
    Ok(Json(state.pipeline.ask(&params.question).await?))
}
