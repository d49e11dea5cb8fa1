//! Health report covering the API and its backing services.

use pdfrag::RagPipeline;
use serde::Serialize;

/// Outcome of one dependency check. Serializes as the detail object when the
/// dependency is up and as `"error: <message>"` when it is not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DependencyStatus<T> {
    Up(T),
    Down(String),
}

impl<T> DependencyStatus<T> {
    fn from_result(result: pdfrag::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Up(value),
            Err(e) => Self::Down(format!("error: {e}")),
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStatus {
    pub status: &'static str,
    pub points_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelsStatus {
    pub status: &'static str,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub api: &'static str,
    pub qdrant: DependencyStatus<StoreStatus>,
    pub ollama: DependencyStatus<ModelsStatus>,
    pub embedder: DependencyStatus<&'static str>,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Check the vector store, the generation service and the embedder
/// concurrently. Never fails; failures are reported inside the report.
pub async fn check(pipeline: &RagPipeline) -> HealthReport {
    let collection = &pipeline.config().collection;
    let (points, models, embedder) = tokio::join!(
        pipeline.vector_store().count(collection),
        pipeline.generator().list_models(),
        pipeline.embedding_provider().health_check(),
    );

    let points = points.map(|points_count| StoreStatus { status: "ok", points_count });
    let models = models.map(|models| ModelsStatus { status: "ok", models });

    HealthReport {
        api: "ok",
        qdrant: DependencyStatus::from_result(points),
        ollama: DependencyStatus::from_result(models),
        embedder: DependencyStatus::from_result(embedder.map(|()| "ok")),
        timestamp: chrono::Utc::now().timestamp(),
    }
}
