use almanac::build::build_site;
use almanac::config::Config;
use anyhow::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_directory(Path::new("."))?;
    let summary = build_site(&config)?;
    tracing::info!(
        written = summary.written,
        skipped = summary.skipped,
        "build complete"
    );
    Ok(())
}
