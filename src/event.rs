//! Event model and wire format
//!
//! Readers turn raw socket bytes into `Event`s; the dispatcher consumes
//! each one exactly once. The relay has no framing: a single read of up to
//! `MAX_READ` bytes is one message.

use crate::client::ClientHandle;
use crate::types::ClientId;

/// Largest chunk read from a socket in one go (one message unit)
pub const MAX_READ: usize = 512;

/// Literal command a client sends to close its own connection
pub const EXIT_COMMAND: &str = "exit";

/// Event sent from a connection reader to the dispatcher
#[derive(Debug)]
pub enum Event {
    /// New client connected; carries the handle the registry will own
    Connected(ClientHandle),
    /// Client connection ended (read error, EOF or exit)
    Disconnected { client_id: ClientId },
    /// Raw chat bytes read from the client
    Chat { client_id: ClientId, payload: Vec<u8> },
}

impl Event {
    /// Identity of the client this event originated from
    pub fn client_id(&self) -> ClientId {
        match self {
            Event::Connected(handle) => handle.id,
            Event::Disconnected { client_id } | Event::Chat { client_id, .. } => *client_id,
        }
    }
}

/// Whether a chunk is the exit command, ignoring surrounding whitespace
pub fn is_exit_command(chunk: &[u8]) -> bool {
    String::from_utf8_lossy(chunk).trim() == EXIT_COMMAND
}

/// `"<id> has connected\n"`
pub fn connected_notice(client_id: ClientId) -> Vec<u8> {
    format!("{} has connected\n", client_id).into_bytes()
}

/// `"<id> has disconnected\n"`
pub fn disconnected_notice(client_id: ClientId) -> Vec<u8> {
    format!("{} has disconnected\n", client_id).into_bytes()
}

/// `"<id> -- <payload>"` with the payload relayed verbatim
pub fn chat_line(client_id: ClientId, payload: &[u8]) -> Vec<u8> {
    let mut line = format!("{} -- ", client_id).into_bytes();
    line.extend_from_slice(payload);
    line
}
