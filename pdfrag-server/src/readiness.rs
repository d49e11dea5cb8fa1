//! Startup polling of the backing services.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

/// A service did not come up within the allowed attempts.
#[derive(Debug, Error)]
#[error("{service} not ready after {attempts} attempts: {last_error}")]
pub struct NotReady {
    pub service: String,
    pub attempts: u32,
    pub last_error: pdfrag::RagError,
}

/// Call `check` until it succeeds, at most `attempts` times, sleeping
/// `interval` between failed attempts. Returns the first successful value.
pub async fn wait_until_ready<T, F, Fut>(
    service: &str,
    attempts: u32,
    interval: Duration,
    mut check: F,
) -> Result<T, NotReady>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = pdfrag::Result<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match check().await {
            Ok(value) => {
                info!(service, attempt, "service ready");
                return Ok(value);
            }
            Err(e) if attempt >= attempts => {
                return Err(NotReady { service: service.to_string(), attempts, last_error: e });
            }
            Err(e) => {
                warn!(service, attempt, attempts, error = %e, "waiting for service");
                tokio::time::sleep(interval).await;
                attempt += 1;
            }
        }
    }
}
