//! Search-page retrieval with retry/backoff.
//!
//! The only stage allowed to block on the network. Transient failures
//! (timeouts, connection errors, 5xx) are retried with capped exponential
//! backoff; everything else fails immediately.

use crate::config::FetchConfig;
use crate::error::PipelineError;
use reqwest::StatusCode;
use std::time::Duration;

const BASE_SEARCH_URL: &str = "https://anaconda.org/search?q=";
const USER_AGENT: &str = concat!("condaget/", env!("CARGO_PKG_VERSION"));

/// Build the search URL for a module name.
pub fn build_search_url(module_name: &str) -> String {
    format!("{}{}", BASE_SEARCH_URL, module_name)
}

/// What to do with a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusOutcome {
    /// Server-side trouble, worth another attempt.
    Retry,
    /// The module does not exist remotely.
    NotFound,
    /// Client-side problem, retrying cannot help.
    Fail,
}

pub(crate) fn classify_status(status: StatusCode) -> StatusOutcome {
    if status == StatusCode::NOT_FOUND {
        StatusOutcome::NotFound
    } else if status.is_server_error() {
        StatusOutcome::Retry
    } else {
        StatusOutcome::Fail
    }
}

/// Delay before the retry following attempt `attempt` (0-based):
/// `base * 2^attempt`, capped at `max_delay`.
pub(crate) fn backoff_delay(cfg: &FetchConfig, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    cfg.base_delay.saturating_mul(factor).min(cfg.max_delay)
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || (err.is_request() && !err.is_builder())
}

/// Fetch the raw search-results page for a module.
///
/// Returns the page body on the first successful attempt. A 404 maps to
/// `NotFound` without retrying; other 4xx fail immediately as `Network`.
pub async fn fetch(module_name: &str, cfg: &FetchConfig) -> Result<String, PipelineError> {
    fetch_url(&build_search_url(module_name), module_name, cfg).await
}

/// The retry loop itself, with the URL injectable so tests can point it at
/// a loopback server.
pub(crate) async fn fetch_url(
    url: &str,
    module_name: &str,
    cfg: &FetchConfig,
) -> Result<String, PipelineError> {
    let client = reqwest::Client::builder()
        .timeout(cfg.request_timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| PipelineError::Network {
            attempts: 0,
            cause: e.to_string(),
        })?;

    let mut last_cause = String::from("no attempts made");
    for attempt in 0..cfg.max_attempts {
        tracing::info!("Sending GET request to {}", url);
        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.text().await.map_err(|e| PipelineError::Network {
                        attempts: attempt + 1,
                        cause: format!("failed reading response body: {}", e),
                    });
                }
                match classify_status(status) {
                    StatusOutcome::NotFound => {
                        return Err(PipelineError::NotFound {
                            module: module_name.to_string(),
                        })
                    }
                    StatusOutcome::Fail => {
                        return Err(PipelineError::Network {
                            attempts: attempt + 1,
                            cause: format!("server returned {}", status),
                        })
                    }
                    StatusOutcome::Retry => {
                        last_cause = format!("server returned {}", status);
                        tracing::warn!("HTTP error occurred: {}", last_cause);
                    }
                }
            }
            Err(e) if is_transient(&e) => {
                last_cause = e.to_string();
                tracing::warn!("Request error occurred: {}", last_cause);
            }
            Err(e) => {
                return Err(PipelineError::Network {
                    attempts: attempt + 1,
                    cause: e.to_string(),
                })
            }
        }

        if attempt + 1 < cfg.max_attempts {
            let delay = backoff_delay(cfg, attempt);
            tracing::info!(
                "Retrying in {:?}... (attempt {}/{})",
                delay,
                attempt + 1,
                cfg.max_attempts
            );
            tokio::time::sleep(delay).await;
        }
    }

    Err(PipelineError::Network {
        attempts: cfg.max_attempts,
        cause: last_cause,
    })
}
