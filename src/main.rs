//! Multi-client TCP Chat Relay - Entry Point
//!
//! Binds the TCP listener and runs the relay until Ctrl-C.

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chat_relay::{bind, serve, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let config = Config::parse();

    // Bind failure is fatal
    let listener = bind(config.bind_addr()).await?;
    info!("Server is listening on {}", listener.local_addr()?);

    tokio::select! {
        _ = serve(listener, config.channel_capacity) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("Failed to listen for ctrl-c: {}", e);
            }
            info!("Shutting down");
        }
    }

    Ok(())
}
