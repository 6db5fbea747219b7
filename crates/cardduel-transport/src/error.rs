/// Errors that can occur in the transport layer.
///
/// Every variant except [`FrameTooLarge`](Self::FrameTooLarge) on the
/// sending side is fatal to the connection it came from.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection was closed (cleanly or by a short read).
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting connections failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// Connecting to a remote listener failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// A frame declared (or tried to carry) more bytes than the receive
    /// buffer can hold.
    #[error("frame of {len} bytes exceeds the {max}-byte limit")]
    FrameTooLarge { len: usize, max: usize },

    /// The transport was shut down.
    #[error("transport shut down")]
    Shutdown,
}
