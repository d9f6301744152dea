use std::time::Duration;

/// Channel priority used when the user expresses no preference, best first.
pub const DEFAULT_CHANNELS: [&str; 4] = ["conda-forge", "anaconda", "main", "auto"];

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Retry/backoff knobs for the search request. Passed into the fetch stage
/// explicitly so tests can inject small delays instead of patching globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Channel ranking for the select stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectConfig {
    pub channel_priority: Vec<String>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            channel_priority: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    pub fetch: FetchConfig,
    pub select: SelectConfig,
    pub install_timeout: InstallTimeout,
}

/// Wall-clock limit for the spawned install command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallTimeout(pub Duration);

impl Default for InstallTimeout {
    fn default() -> Self {
        InstallTimeout(DEFAULT_INSTALL_TIMEOUT)
    }
}

impl PipelineConfig {
    /// Apply environment variable overrides. Only the per-request network
    /// timeout is configurable this way; proxy settings are honored by the
    /// HTTP client itself.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(secs) = std::env::var("CONDAGET_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                self.fetch.request_timeout = Duration::from_secs(secs);
            } else {
                tracing::warn!("Ignoring non-numeric CONDAGET_TIMEOUT_SECS");
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_policy() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.fetch.max_attempts, 3);
        assert_eq!(cfg.fetch.base_delay, Duration::from_secs(1));
        assert_eq!(cfg.fetch.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.select.channel_priority[0], "conda-forge");
        assert_eq!(cfg.select.channel_priority.len(), DEFAULT_CHANNELS.len());
    }
}
