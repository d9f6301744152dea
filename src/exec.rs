//! Install command execution.
//!
//! Dry runs print and spawn nothing. Real runs spawn the validated command
//! as a child process with captured output, a wall-clock limit, and prompt
//! Ctrl-C handling: in both the timeout and interrupt paths the child is
//! killed rather than left running. A non-zero exit is an outcome, not an
//! error, and is never retried here.

use crate::config::InstallTimeout;
use crate::error::PipelineError;
use crate::types::{ExecutionResult, ValidatedCommand};
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;

/// Run (or, for a dry run, print) a validated install command.
pub async fn execute(
    command: &ValidatedCommand,
    dry_run: bool,
    limit: InstallTimeout,
) -> Result<ExecutionResult, PipelineError> {
    if dry_run {
        tracing::info!("Dry run: installation command is printed, not executed");
        println!("{}", command);
        return Ok(ExecutionResult::dry_run());
    }

    run_argv(command.tokens(), limit).await
}

/// Spawn an argv as a child process and wait for it, bounded by `limit`.
///
/// Dropping the in-flight wait future (timeout or Ctrl-C) kills the child
/// via `kill_on_drop`, so no branch can leak a running installer.
pub(crate) async fn run_argv(
    argv: &[String],
    limit: InstallTimeout,
) -> Result<ExecutionResult, PipelineError> {
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!("Executing: {:?}", argv);
    let child = cmd.spawn()?;

    let output = tokio::select! {
        waited = timeout(limit.0, child.wait_with_output()) => match waited {
            Ok(output) => output?,
            Err(_) => return Err(PipelineError::ExecutionTimeout(limit.0)),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, killing install command");
            return Err(PipelineError::Interrupted);
        }
    };

    let result = ExecutionResult {
        succeeded: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        attempts: 1,
    };

    if !result.succeeded {
        tracing::error!(
            "Installation command exited with status {:?}",
            result.exit_code
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;
    use std::time::Duration;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_dry_run_spawns_nothing() {
        // The command names an executable that does not exist on test
        // machines in this shape; dry run must still succeed because no
        // process is spawned.
        let cmd = validate("conda install -c conda-forge pandas").unwrap();
        let result = execute(&cmd, true, InstallTimeout::default()).await.unwrap();

        assert!(result.succeeded);
        assert_eq!(result.exit_code, None);
        assert_eq!(result.attempts, 0);
        assert!(result.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_run_captures_output_and_exit_code() {
        let result = run_argv(&argv(&["echo", "hello"]), InstallTimeout::default())
            .await
            .unwrap();

        assert!(result.succeeded);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.attempts, 1);
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported_not_an_error() {
        let result = run_argv(&argv(&["sh", "-c", "exit 3"]), InstallTimeout::default())
            .await
            .unwrap();

        assert!(!result.succeeded);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.attempts, 1);
    }

    #[tokio::test]
    async fn test_missing_executable_is_a_launch_error() {
        let err = run_argv(
            &argv(&["condaget-no-such-binary"]),
            InstallTimeout::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PipelineError::Spawn(_)));
    }

    #[tokio::test]
    async fn test_timeout_kills_the_child() {
        let limit = InstallTimeout(Duration::from_millis(100));
        let err = run_argv(&argv(&["sleep", "30"]), limit).await.unwrap_err();
        assert!(matches!(err, PipelineError::ExecutionTimeout(_)));
    }
}
