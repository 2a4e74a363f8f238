//! DAHOUSE desktop client entry point.

mod app;
mod config;
mod console;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with console windows.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting DAHOUSE");

    let config_file = config::config_path();
    let config = config::Config::load_from(&config_file)?;
    tracing::info!(
        api = %config.api_base_url,
        locale = ?config.locale,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(config, config_file))?;

    tracing::info!("DAHOUSE shut down");
    Ok(())
}
