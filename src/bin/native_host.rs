//! Aynary Native Host - launched by the browser
//!
//! stdout carries native messaging frames, so logs go to stderr.

use anyhow::Result;
use aynary_bridge::host::{self, DbusDictionary};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Browsers pass the caller origin as an argument; it is not needed here
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("📘 Aynary native host v{} starting", env!("CARGO_PKG_VERSION"));

    let service = DbusDictionary::new();
    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();

    let replies = host::serve(&mut stdin, &mut stdout, &service).await?;
    info!("Native host done ({} replies)", replies);
    Ok(())
}
