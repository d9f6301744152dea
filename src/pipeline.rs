//! End-to-end pipeline: fetch -> parse -> select -> validate -> execute.
//!
//! Strictly sequential, one module per run, and fail-closed: the first stage
//! error aborts the whole run with no cross-stage fallback. The middle
//! stages are pure, so [`resolve`] works on any in-memory page text and the
//! tests never touch the network.

use crate::config::{PipelineConfig, SelectConfig};
use crate::error::PipelineError;
use crate::types::{ExecutionResult, SearchQuery, ValidatedCommand};
use crate::{channel, exec, fetch, page, validate};

/// Run one query end to end.
pub async fn run(
    query: &SearchQuery,
    cfg: &PipelineConfig,
    dry_run: bool,
) -> Result<ExecutionResult, PipelineError> {
    let page_text = fetch::fetch(&query.module_name, &cfg.fetch).await?;
    let command = resolve(&page_text, query, &cfg.select)?;
    exec::execute(&command, dry_run, cfg.install_timeout).await
}

/// The network-free middle of the pipeline: page text in, safe command out.
pub fn resolve(
    page_text: &str,
    query: &SearchQuery,
    cfg: &SelectConfig,
) -> Result<ValidatedCommand, PipelineError> {
    let candidates = page::parse(page_text)?;
    let resolved = channel::select(&candidates, query.preferred_channel.as_deref(), cfg)?;
    tracing::info!(
        "Module '{}' found in channel: {}",
        query.module_name,
        resolved.channel_name
    );
    validate::validate(&resolved.raw_command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANDAS_PAGE: &str = r#"
        <div id="search">
          <h5><a href="/bioconda/pandas">pandas</a>
              <a href="/bioconda"><strong>bioconda</strong></a></h5>
          <code>conda install -c bioconda pandas</code>
          <h5><a href="/conda-forge/pandas">pandas</a>
              <a href="/conda-forge"><strong>conda-forge</strong></a></h5>
          <code>conda install -c conda-forge pandas</code>
        </div>"#;

    fn query(module: &str, channel: Option<&str>) -> SearchQuery {
        SearchQuery {
            module_name: module.to_string(),
            preferred_channel: channel.map(String::from),
        }
    }

    #[test]
    fn test_resolve_prefers_ranked_channel_over_page_order() {
        let cmd = resolve(PANDAS_PAGE, &query("pandas", None), &SelectConfig::default()).unwrap();
        assert_eq!(cmd.to_string(), "conda install -c conda-forge pandas");
    }

    #[test]
    fn test_resolve_honors_user_preference() {
        let cmd = resolve(
            PANDAS_PAGE,
            &query("pandas", Some("bioconda")),
            &SelectConfig::default(),
        )
        .unwrap();
        assert_eq!(cmd.to_string(), "conda install -c bioconda pandas");
    }

    #[test]
    fn test_resolve_unmatched_preference_falls_back() {
        // numpy page lacks an "r" listing: fall back to priority, no error.
        let cmd = resolve(
            PANDAS_PAGE,
            &query("numpy", Some("r")),
            &SelectConfig::default(),
        )
        .unwrap();
        assert_eq!(cmd.to_string(), "conda install -c conda-forge pandas");
    }

    #[test]
    fn test_resolve_rejects_tampered_page_command() {
        let page = r#"<div id="search">
            <h5><strong>conda-forge</strong></h5>
            <code>conda install -c conda-forge pandas; rm -rf /</code>
        </div>"#;

        let err = resolve(page, &query("pandas", None), &SelectConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidCommand { .. }));
    }

    #[test]
    fn test_resolve_empty_listing_is_no_channel() {
        let page = r#"<div id="search"><p>No packages matched.</p></div>"#;
        let err = resolve(page, &query("nope", None), &SelectConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NoChannel { .. }));
    }

    #[test]
    fn test_resolve_unrecognized_page_is_parse_error() {
        let err = resolve(
            "<html><body>505 weird proxy page</body></html>",
            &query("pandas", None),
            &SelectConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
    }
}
