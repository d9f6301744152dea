mod channel;
mod cli;
mod config;
mod error;
mod exec;
mod fetch;
mod page;
mod pipeline;
mod types;
mod validate;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::PipelineConfig;
use error::PipelineError;
use std::io::Write;
use types::SearchQuery;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli)?;

    let module_name = cli.module_name.trim().to_string();
    if module_name.is_empty() {
        tracing::error!("No module name provided");
        std::process::exit(1);
    }

    let query = SearchQuery {
        module_name,
        preferred_channel: cli.channel,
    };
    let cfg = PipelineConfig::default().with_env_overrides();

    match pipeline::run(&query, &cfg, cli.dry_run).await {
        Ok(result) => {
            relay_output(&result);
            if result.succeeded {
                if result.attempts > 0 {
                    tracing::info!("Module '{}' installed successfully", query.module_name);
                }
                Ok(())
            } else {
                // The pipeline itself worked; the install command did not.
                std::process::exit(2);
            }
        }
        Err(e) => {
            if matches!(e, PipelineError::Parse { .. }) {
                tracing::error!("{} (the site layout may have changed)", e);
            } else {
                tracing::error!("{}", e);
            }
            std::process::exit(1);
        }
    }
}

/// Pass the captured installer output through to our own streams.
fn relay_output(result: &types::ExecutionResult) {
    if !result.stdout.is_empty() {
        print!("{}", result.stdout);
        let _ = std::io::stdout().flush();
    }
    if !result.stderr.is_empty() {
        eprint!("{}", result.stderr);
        let _ = std::io::stderr().flush();
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}
