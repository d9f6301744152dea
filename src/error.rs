//! Error taxonomy for the search/resolve/install pipeline.
//!
//! Every stage surfaces its own variant so the caller can tell which stage
//! failed from the message alone. Retries happen inside the fetch stage only;
//! by the time one of these reaches the caller they are final.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The search request failed after all retry attempts were used up.
    #[error("search request failed after {attempts} attempt(s): {cause}")]
    Network { attempts: u32, cause: String },

    /// Anaconda.org explicitly reported the module absent (HTTP 404).
    #[error("module '{module}' not found on anaconda.org")]
    NotFound { module: String },

    /// The search page did not match the expected layout. Usually means the
    /// site markup changed, not that the module is missing.
    #[error("could not parse search results: {reason}")]
    Parse { reason: String },

    /// No channel could be chosen from the search results.
    #[error("no installable channel: {reason}")]
    NoChannel { reason: String },

    /// The install command scraped off the page failed the safety check.
    /// Rejected commands are never repaired or re-tried.
    #[error("install command rejected: {reason}")]
    InvalidCommand { reason: String },

    /// The install subprocess ran past its wall-clock limit and was killed.
    #[error("install command timed out after {0:?} and was killed")]
    ExecutionTimeout(Duration),

    /// Ctrl-C arrived while the install subprocess was running; the child
    /// was killed before returning.
    #[error("interrupted before the install command finished")]
    Interrupted,

    /// The install command could not be launched at all (e.g. conda is not
    /// on PATH).
    #[error("could not launch install command: {0}")]
    Spawn(#[from] std::io::Error),
}

impl PipelineError {
    pub fn parse(reason: impl Into<String>) -> Self {
        PipelineError::Parse {
            reason: reason.into(),
        }
    }

    pub fn invalid_command(reason: impl Into<String>) -> Self {
        PipelineError::InvalidCommand {
            reason: reason.into(),
        }
    }
}
