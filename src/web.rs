#![cfg(not(tarpaulin_include))]

use clap::Parser;
use sheet_dashboard::app;
use sheet_dashboard::config::Config;

/// Main entry point for the dashboard web server
///
/// Reads configuration from flags and the environment, sets up logging
/// (`RUST_LOG`, `info` by default) and serves until the process is stopped.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    app::run(config).await
}
