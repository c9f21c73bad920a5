//! Multi-client TCP Chat Relay Library
//!
//! Clients connect over TCP and send raw text; every chunk a client sends
//! is relayed to all other connected clients, along with connect and
//! disconnect announcements.
//!
//! # Wire format
//! - No framing: one socket read of up to 512 bytes is one message
//! - Chat: `"<addr> -- <raw bytes>"`
//! - Connect: `"<addr> has connected\n"`
//! - Disconnect: `"<addr> has disconnected\n"`
//! - A chunk that trims to `exit` closes the sender's connection
//!
//! # Architecture
//! Uses the Actor pattern with a single `mpsc` channel:
//! - `Dispatcher` is the central actor and sole owner of the `Registry`
//! - Each connection has a reader task that turns socket reads into `Event`s
//! - No locks needed - all registry access goes through message passing
//!
//! # Example
//! ```ignore
//! use chat_relay::listener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = listener::bind("127.0.0.1:6969".parse().unwrap()).await.unwrap();
//!     listener::serve(listener, 1).await;
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod listener;
pub mod reader;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use client::ClientHandle;
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{AppError, SendError};
pub use event::{Event, MAX_READ};
pub use listener::{bind, serve};
pub use reader::handle_connection;
pub use registry::Registry;
pub use types::ClientId;
