use std::fmt;

/// One search-and-install request as handed over by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub module_name: String,
    pub preferred_channel: Option<String>,
}

/// A (channel, install command) pair discovered on the search page.
/// Candidates keep page order; duplicates are allowed and resolved later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCandidate {
    pub channel_name: String,
    pub install_command: String,
}

/// The single candidate the selector settled on. `raw_command` is still the
/// untrusted page text and must pass validation before being run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub channel_name: String,
    pub raw_command: String,
}

/// An install command that passed the safety check. Can only be built by
/// the validator, so holding one implies the token invariants hold:
/// `conda install`, recognized flags, exactly one safe package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    pub(crate) tokens: Vec<String>,
}

impl ValidatedCommand {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for ValidatedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Outcome of the execute stage. `attempts` is 0 for a dry run (nothing was
/// spawned) and 1 otherwise; install commands are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub attempts: u32,
}

impl ExecutionResult {
    pub fn dry_run() -> Self {
        Self {
            succeeded: true,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            attempts: 0,
        }
    }
}
