//! Length-prefixed framing over a byte stream.
//!
//! TCP delivers a stream of bytes, not messages. To know where one
//! message ends and the next begins, every message is prefixed with its
//! length:
//!
//! ```text
//! ┌─────────────────────────────┬──────────────────────────────┐
//! │ length: u32, big-endian (4) │ body: `length` bytes (UTF-8) │
//! └─────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! The reader never looks inside the body. It consumes exactly `length`
//! bytes whether the body is valid JSON or garbage, so a bad payload can
//! never knock the stream out of alignment.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::TransportError;

/// Size of the length prefix in bytes.
pub const HEADER_LEN: usize = 4;

/// Largest body a peer may declare. The receive buffer is exactly this
/// big, so anything larger is a protocol violation.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Prefixes `body` with its big-endian length.
///
/// The result is a single buffer, so writing it with one `write_all`
/// can never interleave this prefix with another message's body.
///
/// # Errors
/// Returns [`TransportError::FrameTooLarge`] if `body` is longer than
/// [`MAX_FRAME_LEN`].
pub fn encode_frame(body: &[u8]) -> Result<Vec<u8>, TransportError> {
    if body.len() > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge {
            len: body.len(),
            max: MAX_FRAME_LEN,
        });
    }

    let mut frame = Vec::with_capacity(HEADER_LEN + body.len());
    // `as u32` cannot truncate: we just checked len <= 64 KiB.
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(body);
    Ok(frame)
}

/// Interprets a 4-byte header as a body length.
///
/// # Errors
/// Returns [`TransportError::FrameTooLarge`] if the declared length is
/// larger than [`MAX_FRAME_LEN`].
pub fn decode_header(header: [u8; HEADER_LEN]) -> Result<usize, TransportError> {
    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        });
    }
    Ok(len)
}

/// Splits one complete frame off the front of `bytes`.
///
/// Returns `Ok(Some((body, consumed)))` when a whole frame is present,
/// where `consumed` is `HEADER_LEN + body.len()`. Returns `Ok(None)`
/// when more bytes are needed.
pub fn split_frame(bytes: &[u8]) -> Result<Option<(&[u8], usize)>, TransportError> {
    let Some(header) = bytes.first_chunk::<HEADER_LEN>() else {
        return Ok(None);
    };
    let len = decode_header(*header)?;
    let end = HEADER_LEN + len;
    if bytes.len() < end {
        return Ok(None);
    }
    Ok(Some((&bytes[HEADER_LEN..end], end)))
}

// ---------------------------------------------------------------------------
// ReadState
// ---------------------------------------------------------------------------

/// Where a [`FrameReader`] is in the two-phase read cycle.
///
/// ```text
/// AwaitingHeader ──(4 bytes)──→ AwaitingBody { len } ──(len bytes)──┐
///       ↑                                                            │
///       └────────────────────────────────────────────────────────────┘
///
/// any short read, socket error or oversized header ──→ Closed
/// ```
///
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    AwaitingHeader,
    AwaitingBody { len: usize },
    Closed,
}

// ---------------------------------------------------------------------------
// FrameReader
// ---------------------------------------------------------------------------

/// Reads length-prefixed frames from any async byte source.
///
/// Owns a reusable buffer of [`MAX_FRAME_LEN`] bytes. Generic over the
/// reader so tests can drive it with `tokio::io::duplex` instead of a
/// real socket.
pub struct FrameReader<R> {
    inner: R,
    state: ReadState,
    header: [u8; HEADER_LEN],
    buf: Box<[u8]>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wraps a byte source. Starts in [`ReadState::AwaitingHeader`].
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: ReadState::AwaitingHeader,
            header: [0; HEADER_LEN],
            buf: vec![0; MAX_FRAME_LEN].into_boxed_slice(),
        }
    }

    /// Returns the current read state.
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Reads the next complete frame body.
    ///
    /// Once this returns an error the reader is `Closed` and every
    /// later call fails immediately without touching the source.
    ///
    /// # Errors
    /// - [`TransportError::ConnectionClosed`] on EOF or a short read
    /// - [`TransportError::ReceiveFailed`] on any other I/O error
    /// - [`TransportError::FrameTooLarge`] if the header declares more
    ///   than [`MAX_FRAME_LEN`] bytes
    pub async fn next_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        loop {
            match self.state {
                ReadState::Closed => {
                    return Err(TransportError::ConnectionClosed(
                        "reader already closed".into(),
                    ));
                }
                ReadState::AwaitingHeader => {
                    if let Err(e) = self.inner.read_exact(&mut self.header).await {
                        self.state = ReadState::Closed;
                        return Err(map_read_error(e));
                    }
                    match decode_header(self.header) {
                        Ok(len) => self.state = ReadState::AwaitingBody { len },
                        Err(e) => {
                            self.state = ReadState::Closed;
                            return Err(e);
                        }
                    }
                }
                ReadState::AwaitingBody { len } => {
                    let body = &mut self.buf[..len];
                    if let Err(e) = self.inner.read_exact(body).await {
                        self.state = ReadState::Closed;
                        return Err(map_read_error(e));
                    }
                    self.state = ReadState::AwaitingHeader;
                    return Ok(body.to_vec());
                }
            }
        }
    }
}

fn map_read_error(e: std::io::Error) -> TransportError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        TransportError::ConnectionClosed("peer closed the connection".into())
    } else {
        TransportError::ReceiveFailed(e)
    }
}
