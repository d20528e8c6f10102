//! CLI argument parsing using clap.
//!
//! Defines the command-line interface for flock-cli.

use clap::Parser;
use std::path::PathBuf;

/// Flock CLI - Replay scroll scripts against the feed arbitration engine
#[derive(Parser, Debug, Clone)]
#[command(name = "flock-cli")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Scroll script to replay (TOML)
    pub script: PathBuf,

    /// Engine config file (default: ~/.flock/feed.toml if present)
    #[arg(short = 'c', long, env = "FLOCK_FEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the debounce window in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Output events as JSON lines (for scripting/parsing)
    #[arg(long)]
    pub json: bool,

    /// Only output the final active item
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["flock-cli", "scroll.toml"]);
        assert_eq!(args.script, PathBuf::from("scroll.toml"));
        assert!(args.debounce_ms.is_none());
        assert!(!args.json);
        assert!(!args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "flock-cli",
            "scroll.toml",
            "--config",
            "feed.toml",
            "--debounce-ms",
            "50",
            "--json",
            "-q",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("feed.toml")));
        assert_eq!(args.debounce_ms, Some(50));
        assert!(args.json);
        assert!(args.quiet);
    }

    #[test]
    fn test_script_is_required() {
        assert!(Args::try_parse_from(["flock-cli"]).is_err());
    }
}
