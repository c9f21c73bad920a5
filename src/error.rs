//! Error types for the chat relay
//!
//! Defines application-level errors and per-peer write errors.
//! Uses thiserror for ergonomic error definitions.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Application-level errors
///
/// Only `Bind` is fatal to the process. Every other variant is contained
/// to the connection it occurred on.
#[derive(Debug, Error)]
pub enum AppError {
    /// Listener could not be bound at startup (fatal)
    #[error("Unable to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Reading from a client socket failed (terminates that client)
    #[error("Read error: {0}")]
    Read(#[source] io::Error),

    /// Other IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Channel send error (dispatcher is gone)
    #[error("Channel send error")]
    ChannelSend,
}

/// Message send errors
///
/// Occurs when writing to a single peer fails.
#[derive(Debug, Error)]
pub enum SendError {
    /// The connection was already closed by its reader
    #[error("Connection closed")]
    Closed,

    /// The peer's socket rejected the write
    #[error("Write failed: {0}")]
    Write(#[from] io::Error),
}
