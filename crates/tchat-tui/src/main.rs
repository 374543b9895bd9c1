//! tchat entry point.

use clap::Parser;
use tchat_client::transport::WsConnector;
use tchat_tui::{Args, Runtime, TerminalDriver, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref(), &args.log_level)?;

    let config = args.client_config();
    tracing::info!(endpoint = %config.endpoint, timestamps = config.timestamps, "starting");

    let driver = TerminalDriver::new()?;
    let runtime = Runtime::new(driver, WsConnector, config);

    Ok(runtime.run().await?)
}
