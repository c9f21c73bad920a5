//! Connection acceptor
//!
//! Starts the dispatcher and spawns one connection reader per accepted
//! TCP connection.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::AppError;
use crate::event::Event;
use crate::reader::handle_connection;

/// Bind the relay's TCP listener
///
/// Failure here is the only fatal condition of the relay.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, AppError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })
}

/// Run the relay on an already bound listener
///
/// Spawns the dispatcher, then accepts connections forever. Accept errors
/// are logged and the loop continues.
pub async fn serve(listener: TcpListener, channel_capacity: usize) {
    let (events_tx, events_rx) = mpsc::channel(channel_capacity.max(1));
    tokio::spawn(Dispatcher::new(events_rx).run());

    info!("Dispatcher spawned, accepting connections");

    accept_loop(listener, events_tx).await;
}

async fn accept_loop(listener: TcpListener, events: mpsc::Sender<Event>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                debug!("Accepted connection from {}", addr);
                let events = events.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, events).await {
                        warn!("Connection {} ended with error: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("Could not accept connection: {}", e);
            }
        }
    }
}
