//! Flock CLI - Replay scroll scripts against the feed arbitration engine
//!
//! Feeds a timed sequence of register / report / unregister steps into a
//! real `FeedEngine` and prints every play/pause command and active-item
//! change it produces.
//!
//! # Usage
//!
//! ```bash
//! # Build the CLI binary
//! cargo build --features cli --bin flock-cli
//!
//! # Replay a script
//! ./target/debug/flock-cli demos/sunday-scroll.toml
//!
//! # JSON output for scripting
//! ./target/debug/flock-cli demos/sunday-scroll.toml --json | jq .
//!
//! # Only the settled active item
//! ./target/debug/flock-cli demos/sunday-scroll.toml --quiet
//! ```

use anyhow::Result;
use clap::Parser;

use flock_lib::cli::{execute_script, initialize, Args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose {
        "flock_lib=debug"
    } else {
        "flock_lib=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    let ctx = initialize(&args)?;
    execute_script(&ctx).await
}
