use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr
///
/// Stdout is reserved for the transcript, so all diagnostics go to
/// stderr. `RUST_LOG` overrides the default `info` filter.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    Ok(())
}
