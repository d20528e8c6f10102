//! CLI bootstrap - Resolve configuration and load the replay script.

use anyhow::{Context, Result};

use crate::config::{default_config_path, FeedConfig};

use super::args::Args;
use super::script::Script;

/// Everything a replay needs, resolved from the command line.
pub struct CliContext {
    /// Command-line arguments
    pub args: Args,

    /// Engine configuration after file, env and flag overrides
    pub config: FeedConfig,

    /// Parsed and validated script
    pub script: Script,
}

/// Load config (explicit path, else the default location), apply overrides,
/// and parse the script.
pub fn initialize(args: &Args) -> Result<CliContext> {
    let config = match &args.config {
        Some(path) => FeedConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => FeedConfig::load_or_default(&default_config_path()),
    };
    let mut config = config.with_env_overrides();
    if let Some(ms) = args.debounce_ms {
        config.debounce_ms = ms;
    }
    tracing::debug!("[feed-cli] Effective config: {:?}", config);

    let script = Script::load(&args.script)
        .with_context(|| format!("Failed to load script: {}", args.script.display()))?;

    Ok(CliContext {
        args: args.clone(),
        config,
        script,
    })
}
