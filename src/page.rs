//! Search-page scraping.
//!
//! Pure text-in, candidates-out: no network, so the whole stage is testable
//! against fixture HTML. The expected shape is the Anaconda.org search page:
//! a `id="search"` results container holding one entry per package, each
//! entry carrying the channel name in a `<strong>` tag and the literal
//! `conda install` snippet in a `<code>` tag.
//!
//! Extraction is deliberately tolerant: case-insensitive tags, whitespace and
//! attribute noise ignored, entries missing a command skipped. A page without
//! the results container at all is a parse failure, since that usually means
//! the site layout changed.

use crate::error::PipelineError;
use crate::types::ChannelCandidate;
use regex::Regex;

/// Parse the raw search page into channel candidates, in page order.
///
/// An empty vec is a valid outcome: the module exists but no channel lists
/// an install command for it.
pub fn parse(page: &str) -> Result<Vec<ChannelCandidate>, PipelineError> {
    let container = results_container(page).ok_or_else(|| {
        PipelineError::parse("no search results container in page (layout change?)")
    })?;

    let entry_re = Regex::new(r"(?i)<h5[\s>]").expect("hardcoded pattern");
    let channel_re =
        Regex::new(r"(?is)<strong[^>]*>\s*([^<]+?)\s*</strong>").expect("hardcoded pattern");
    let command_re = Regex::new(r"(?is)<code[^>]*>\s*(conda(?:\s|&nbsp;)+install[^<]*?)\s*</code>")
        .expect("hardcoded pattern");

    let starts: Vec<usize> = entry_re.find_iter(container).map(|m| m.start()).collect();

    let mut candidates = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(container.len());
        let entry = &container[start..end];

        let Some(channel) = channel_re.captures(entry) else {
            tracing::debug!("Skipping results entry without a channel label");
            continue;
        };
        let Some(command) = command_re.captures(entry) else {
            tracing::debug!(
                "Channel '{}' listed without an install command, skipping",
                &channel[1]
            );
            continue;
        };

        candidates.push(ChannelCandidate {
            channel_name: channel[1].trim().to_string(),
            install_command: unescape(command[1].trim()),
        });
    }

    Ok(candidates)
}

/// Locate the results container and return the page from its opening tag on.
/// Scanning past the container's end is harmless: entries only ever live
/// inside it.
fn results_container(page: &str) -> Option<&str> {
    let idx = page
        .find("id=\"search\"")
        .or_else(|| page.find("id='search'"))?;
    Some(&page[idx..])
}

/// Undo the handful of HTML entities that show up in command snippets.
fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
