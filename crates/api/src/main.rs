//! Solar Panel Monitor - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(config.log_format);

    info!("=== Solar Panel Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    config.log_config();

    run_server(config).await?;
    Ok(())
}
