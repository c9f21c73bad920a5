//! Connection reader
//!
//! Bridges one client's raw byte stream into a sequence of `Event`s for the
//! dispatcher: `Connected`, any number of `Chat`, then exactly one
//! `Disconnected`.

use std::io;
use std::net::Shutdown;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadBuf};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::ClientHandle;
use crate::error::AppError;
use crate::event::{self, Event, MAX_READ};
use crate::types::ClientId;

/// Read half of a TCP connection that shuts the whole socket down on drop
struct ClosingReadHalf {
    half: OwnedReadHalf,
    socket: std::net::TcpStream,
}

impl AsyncRead for ClosingReadHalf {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.half).poll_read(cx, buf)
    }
}

impl Drop for ClosingReadHalf {
    fn drop(&mut self) {
        // The peer may already be gone
        let _ = self.socket.shutdown(Shutdown::Both);
    }
}

/// Handle a new TCP connection
///
/// Splits the socket, keeps the read half and hands the write half to the
/// dispatcher. The socket is shut down for both directions as soon as
/// reading stops, before the dispatcher hears about the disconnect.
pub async fn handle_connection(
    stream: TcpStream,
    events: mpsc::Sender<Event>,
) -> Result<(), AppError> {
    let client_id = ClientId(stream.peer_addr()?);

    let stream = stream.into_std()?;
    let socket = stream.try_clone()?;
    let (half, writer) = TcpStream::from_std(stream)?.into_split();

    let reader = ClosingReadHalf { half, socket };
    run_connection(client_id, reader, writer, events).await
}

/// Drive one connection from registration to disconnection
///
/// Sends `Connected`, relays chunks until EOF, `exit` or a read error, then
/// closes the connection and sends `Disconnected` exactly once. Once closed,
/// the dispatcher's handle refuses further writes. A read error is returned
/// after the disconnect has been sent.
pub async fn run_connection<R, W>(
    client_id: ClientId,
    mut reader: R,
    writer: W,
    events: mpsc::Sender<Event>,
) -> Result<(), AppError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let (handle, guard) = ClientHandle::guarded(client_id, Box::new(writer));
    if events.send(Event::Connected(handle)).await.is_err() {
        return Err(AppError::ChannelSend);
    }

    let result = read_loop(client_id, &mut reader, &events).await;
    drop(reader);
    drop(guard);

    if events
        .send(Event::Disconnected { client_id })
        .await
        .is_err()
    {
        debug!("Dispatcher closed before disconnect of {}", client_id);
    }

    result
}

/// Read chunks and forward them as chat events until the connection ends
async fn read_loop<R>(
    client_id: ClientId,
    reader: &mut R,
    events: &mpsc::Sender<Event>,
) -> Result<(), AppError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = [0u8; MAX_READ];

    loop {
        let n = reader.read(&mut buffer).await.map_err(AppError::Read)?;

        if n == 0 {
            debug!("Client {} closed the connection", client_id);
            return Ok(());
        }

        let chunk = &buffer[..n];
        if event::is_exit_command(chunk) {
            debug!("Client {} sent exit", client_id);
            return Ok(());
        }

        let chat = Event::Chat {
            client_id,
            payload: chunk.to_vec(),
        };
        if events.send(chat).await.is_err() {
            return Err(AppError::ChannelSend);
        }
    }
}
