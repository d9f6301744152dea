use clap::Parser;

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // If there's a git tag at HEAD, use just the tag (release build)
    if let Some(tag) = option_env!("CONDAGET_GIT_TAG") {
        return tag;
    }

    // Not on a tag - include commit hash and branch (dev build)
    let commit = option_env!("CONDAGET_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("CONDAGET_GIT_BRANCH").unwrap_or("unknown");

    // Return a static string by leaking the formatted string
    // This is safe because it only happens once at startup
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "condaget")]
#[command(about = "Search Anaconda.org for a package and install it from the best channel")]
#[command(version = get_version())]
pub struct Cli {
    /// Name of the module to search for
    pub module_name: String,

    /// Preferred channel for installation (e.g. conda-forge)
    #[arg(long)]
    pub channel: Option<String>,

    /// Display the installation command without executing it
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "condaget",
            "pandas",
            "--channel",
            "conda-forge",
            "--dry-run",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.module_name, "pandas");
        assert_eq!(cli.channel.as_deref(), Some("conda-forge"));
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_module_name_is_required() {
        assert!(Cli::try_parse_from(["condaget"]).is_err());
        assert!(Cli::try_parse_from(["condaget", "--dry-run"]).is_err());
    }

    #[test]
    fn test_channel_defaults_to_none() {
        let cli = Cli::try_parse_from(["condaget", "numpy"]).unwrap();
        assert_eq!(cli.channel, None);
        assert!(!cli.dry_run);
    }
}
