//! `pdfrag-server` exposes the [`pdfrag`] pipeline over HTTP: upload a PDF,
//! ask a question about the uploaded documents, and check service health.

pub mod config;
pub mod error;
pub mod health;
pub mod model_check;
pub mod readiness;
pub mod server;

pub use config::{Cli, Command, ServerConfig};
pub use error::ApiError;
pub use server::{AppState, app_router, build_pipeline, run_server};
