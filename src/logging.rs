use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize `tracing` output on stderr; stdout is kept for the status lines.
///
/// `RUST_LOG` is honoured unless `verbose` forces debug output for this crate.
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::new("image_fetcher=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!("logging initialized");

    Ok(())
}
