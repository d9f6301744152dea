//! Channel selection policy.
//!
//! Deterministic and pure: preferred channel first, then the configured
//! priority list, then the first candidate in page order as a last resort.
//! Duplicate channel names resolve to the first occurrence on the page.

use crate::config::SelectConfig;
use crate::error::PipelineError;
use crate::types::{ChannelCandidate, ResolvedChannel};

/// Pick exactly one candidate.
///
/// A preferred channel that matches nothing is not an error; selection falls
/// back to the priority list so the user still gets the best available
/// channel.
pub fn select(
    candidates: &[ChannelCandidate],
    preferred: Option<&str>,
    cfg: &SelectConfig,
) -> Result<ResolvedChannel, PipelineError> {
    if candidates.is_empty() {
        return Err(PipelineError::NoChannel {
            reason: "module found, but no channel lists an install command".to_string(),
        });
    }

    if let Some(pref) = preferred {
        if let Some(candidate) = find_channel(candidates, pref) {
            tracing::info!("Using preferred channel '{}'", candidate.channel_name);
            return Ok(resolve(candidate));
        }
        tracing::warn!(
            "Preferred channel '{}' not among the listed channels, falling back to defaults",
            pref
        );
    }

    for wanted in &cfg.channel_priority {
        if let Some(candidate) = find_channel(candidates, wanted) {
            return Ok(resolve(candidate));
        }
    }

    // Nothing ranked matched; take whatever the page listed first.
    tracing::info!(
        "No priority channel listed, falling back to '{}'",
        candidates[0].channel_name
    );
    Ok(resolve(&candidates[0]))
}

fn find_channel<'a>(
    candidates: &'a [ChannelCandidate],
    name: &str,
) -> Option<&'a ChannelCandidate> {
    candidates
        .iter()
        .find(|c| c.channel_name.eq_ignore_ascii_case(name))
}

fn resolve(candidate: &ChannelCandidate) -> ResolvedChannel {
    ResolvedChannel {
        channel_name: candidate.channel_name.clone(),
        raw_command: candidate.install_command.clone(),
    }
}
