//! Client handle definition
//!
//! Represents a connected client from the dispatcher's point of view:
//! its identity and the write side of its socket.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;

use crate::error::SendError;
use crate::types::ClientId;

/// Boxed write half of a client connection
pub type ClientWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Connected client handle
///
/// Created by the connection reader on accept and handed to the dispatcher
/// inside a `Connected` event. From then on the dispatcher's registry owns
/// it exclusively; dropping it closes the write side of the socket.
pub struct ClientHandle {
    /// Identity key for this client
    pub id: ClientId,
    writer: ClientWriter,
    /// Fires once the connection's reader has closed the connection
    closed: Option<oneshot::Receiver<()>>,
}

/// Held by the connection reader for as long as the connection is open
///
/// Dropping it marks the paired `ClientHandle` as closed; every later
/// `send` fails without touching the socket.
#[derive(Debug)]
pub struct ConnectionGuard {
    _open: oneshot::Sender<()>,
}

impl ClientHandle {
    /// Create a new handle from an identity and a writer
    ///
    /// The handle is only closed by dropping it.
    pub fn new(id: ClientId, writer: ClientWriter) -> Self {
        Self {
            id,
            writer,
            closed: None,
        }
    }

    /// Create a handle whose writes stop once the returned guard is dropped
    pub fn guarded(id: ClientId, writer: ClientWriter) -> (Self, ConnectionGuard) {
        let (open, closed) = oneshot::channel();
        let handle = Self {
            id,
            writer,
            closed: Some(closed),
        };
        (handle, ConnectionGuard { _open: open })
    }

    /// Check if the reader side has closed this connection
    pub fn is_closed(&mut self) -> bool {
        match self.closed.as_mut() {
            Some(closed) => !matches!(closed.try_recv(), Err(oneshot::error::TryRecvError::Empty)),
            None => false,
        }
    }

    /// Write raw bytes to this client
    ///
    /// Suspends for the duration of the write. Returns an error if the
    /// connection was closed by its reader or the peer's socket is no
    /// longer writable.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Closed);
        }
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
