//! TCP transport: listener, connections, and the per-connection writer.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::frame::{FrameReader, encode_frame};
use crate::{ConnectionId, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> ConnectionId {
    ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
}

// ---------------------------------------------------------------------------
// TcpTransport
// ---------------------------------------------------------------------------

/// A TCP [`Transport`] that listens for incoming connections.
///
/// [`shutdown`](Transport::shutdown) drops the listening socket, so any
/// later connection attempt is refused by the operating system.
pub struct TcpTransport {
    listener: Option<TcpListener>,
}

impl TcpTransport {
    /// Binds a new TCP transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "TCP transport listening");
        Ok(Self {
            listener: Some(listener),
        })
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        match &self.listener {
            Some(listener) => listener.local_addr(),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "transport shut down",
            )),
        }
    }
}

impl Transport for TcpTransport {
    type Connection = TcpConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let listener = self.listener.as_ref().ok_or(TransportError::Shutdown)?;
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let id = next_connection_id();
        tracing::debug!(%id, %peer, "accepted TCP connection");
        Ok(TcpConnection { id, stream, peer })
    }

    async fn shutdown(&mut self) -> Result<(), Self::Error> {
        if self.listener.take().is_some() {
            tracing::info!("TCP transport stopped listening");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TcpConnection
// ---------------------------------------------------------------------------

/// A single TCP connection, before it is split into its two halves.
pub struct TcpConnection {
    id: ConnectionId,
    stream: TcpStream,
    peer: SocketAddr,
}

impl TcpConnection {
    /// Opens a connection to a remote listener.
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        let peer = stream.peer_addr().map_err(TransportError::ConnectFailed)?;
        let id = next_connection_id();
        tracing::debug!(%id, %peer, "connected");
        Ok(Self { id, stream, peer })
    }

    /// Returns the unique identifier for this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the remote address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Splits the connection into a frame reader and a frame sender.
    ///
    /// Spawns the writer task, so this must be called from inside a
    /// Tokio runtime.
    pub fn into_parts(self) -> (FrameReader<OwnedReadHalf>, FrameSender) {
        let (read, write) = self.stream.into_split();
        let sender = spawn_writer(self.id, write);
        (FrameReader::new(read), sender)
    }
}

// ---------------------------------------------------------------------------
// FrameSender / writer task
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Outgoing {
    Frame(Vec<u8>),
    Close,
}

/// Handle for sending frames on one connection.
///
/// Sends are fire-and-forget: [`send`](Self::send) encodes the frame and
/// queues it for the connection's writer task, which writes frames one
/// at a time in queue order. The queued buffer belongs to the writer
/// task until the write completes.
///
/// The queue is unbounded. A peer that stops reading makes it grow
/// without limit; nothing here pushes back.
#[derive(Debug, Clone)]
pub struct FrameSender {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Outgoing>,
}

impl FrameSender {
    /// Returns the connection this sender writes to.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues `body` as one length-prefixed frame.
    ///
    /// # Errors
    /// - [`TransportError::FrameTooLarge`] if `body` exceeds the limit
    /// - [`TransportError::ConnectionClosed`] if the writer has stopped
    pub fn send(&self, body: &[u8]) -> Result<(), TransportError> {
        let frame = encode_frame(body)?;
        self.tx
            .send(Outgoing::Frame(frame))
            .map_err(|_| TransportError::ConnectionClosed(format!("{} writer stopped", self.id)))
    }

    /// Asks the writer to flush what is already queued, then shut the
    /// connection down. Frames queued after this are dropped.
    pub fn close(&self) {
        let _ = self.tx.send(Outgoing::Close);
    }

    /// Completes once the writer task has stopped, whether because of
    /// [`close`](Self::close) or a write error.
    pub async fn closed(&self) {
        self.tx.closed().await;
    }

    /// Returns `true` if the writer task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawns a writer task for `writer` and returns the handle feeding it.
pub fn spawn_writer<W>(id: ConnectionId, writer: W) -> FrameSender
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(write_loop(id, writer, rx));
    FrameSender { id, tx }
}

async fn write_loop<W>(id: ConnectionId, mut writer: W, mut rx: mpsc::UnboundedReceiver<Outgoing>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(outgoing) = rx.recv().await {
        match outgoing {
            Outgoing::Frame(frame) => {
                if let Err(e) = writer.write_all(&frame).await {
                    tracing::debug!(%id, error = %e, "write failed");
                    break;
                }
            }
            Outgoing::Close => {
                tracing::debug!(%id, "closing connection");
                break;
            }
        }
    }

    let _ = writer.shutdown().await;
    // `rx` drops here, which wakes every `FrameSender::closed()`.
}
