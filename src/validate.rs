//! Safety gate for the scraped install command.
//!
//! The command came off a third-party web page, so it is treated as hostile
//! until proven otherwise. Validation rejects, never repairs: the accepted
//! grammar is exactly `conda install`, optional `-c`/`--channel <channel>`,
//! and one package name, where channel and package match a conservative
//! identifier pattern. Shell metacharacters, path separators, extra flags or
//! extra packages all fail.

use crate::error::PipelineError;
use crate::types::ValidatedCommand;
use regex::Regex;

const EXPECTED_EXECUTABLE: &str = "conda";
const EXPECTED_SUBCOMMAND: &str = "install";

fn identifier_pattern() -> Regex {
    // Alphanumeric plus dot, dash, underscore; must start alphanumeric so
    // nothing flag-shaped can pass as a name.
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("hardcoded pattern")
}

/// Check a raw command and, if it is a well-formed `conda install`
/// invocation, hand back its tokens for execution.
pub fn validate(raw_command: &str) -> Result<ValidatedCommand, PipelineError> {
    let ident = identifier_pattern();
    let tokens: Vec<String> = raw_command.split_whitespace().map(String::from).collect();

    if tokens.len() < 3 {
        return Err(PipelineError::invalid_command(
            "command too short, expected 'conda install <package>'",
        ));
    }
    if tokens[0] != EXPECTED_EXECUTABLE {
        return Err(PipelineError::invalid_command(format!(
            "expected '{}' as the executable, got '{}'",
            EXPECTED_EXECUTABLE, tokens[0]
        )));
    }
    if tokens[1] != EXPECTED_SUBCOMMAND {
        return Err(PipelineError::invalid_command(format!(
            "expected '{}' subcommand, got '{}'",
            EXPECTED_SUBCOMMAND, tokens[1]
        )));
    }

    let mut package: Option<&str> = None;
    let mut i = 2;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "-c" || token == "--channel" {
            let Some(channel) = tokens.get(i + 1) else {
                return Err(PipelineError::invalid_command(format!(
                    "'{}' flag without a channel name",
                    token
                )));
            };
            if !ident.is_match(channel) {
                return Err(PipelineError::invalid_command(format!(
                    "channel name '{}' is not a safe identifier",
                    channel
                )));
            }
            i += 2;
        } else if ident.is_match(token) {
            if package.is_some() {
                return Err(PipelineError::invalid_command(format!(
                    "unexpected extra package argument '{}'",
                    token
                )));
            }
            package = Some(token);
            i += 1;
        } else {
            return Err(PipelineError::invalid_command(format!(
                "unexpected token '{}'",
                token
            )));
        }
    }

    if package.is_none() {
        return Err(PipelineError::invalid_command("no package argument"));
    }

    Ok(ValidatedCommand { tokens })
}
