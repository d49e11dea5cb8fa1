//! The `check-model` command: is the generation model installed yet?

use pdfrag::RagError;
use pdfrag::ollama::OllamaClient;
use tracing::{error, info};

use crate::config::{CheckModelArgs, ServerConfig};
use crate::readiness::wait_until_ready;

/// Poll Ollama until `model` shows up in its model list.
pub async fn model_available(client: &OllamaClient, model: &str, args: &CheckModelArgs) -> bool {
    let installed = || async {
        if client.has_model(model).await? {
            Ok::<(), RagError>(())
        } else {
            Err(RagError::GenerationError {
                provider: "Ollama".to_string(),
                message: format!("model '{model}' is not installed yet"),
            })
        }
    };

    match wait_until_ready("ollama model", args.attempts, args.interval(), installed).await {
        Ok(()) => {
            info!(model, "model is installed and ready");
            true
        }
        Err(e) => {
            error!(error = %e, "model check failed");
            false
        }
    }
}

/// Run the command against the configured Ollama server.
pub async fn run(config: &ServerConfig, args: &CheckModelArgs) -> bool {
    let client = OllamaClient::new(config.ollama_url.clone());
    model_available(&client, &config.generation_model, args).await
}
