/// Errors that can occur in the transport layer.
///
/// A clean close is not an error here; [`recv`] signals it with
/// `Ok(None)` so the handler can tell a departed peer from a broken one.
///
/// [`recv`]: crate::Connection::recv
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Writing a frame to the peer failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading the next frame from the peer failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or upgrading an incoming connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
