//! Where deck lists come from.

use crate::ClientError;

/// Supplies raw deck text for an `upload` command.
///
/// The client never parses deck text itself; it ships whatever the source
/// returns and lets the server judge it.
pub trait DeckSource {
    /// Returns the full text of the deck at `path`.
    ///
    /// # Errors
    /// Returns [`ClientError::DeckLoad`] if the deck cannot be read or is
    /// empty.
    fn load(&self, path: &str) -> Result<String, ClientError>;
}

/// Reads deck lists from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDeckSource;

impl DeckSource for FsDeckSource {
    fn load(&self, path: &str) -> Result<String, ClientError> {
        match std::fs::read_to_string(path) {
            Ok(text) if !text.is_empty() => Ok(text),
            Ok(_) => Err(ClientError::DeckLoad { path: path.into() }),
            Err(e) => {
                tracing::debug!(path, error = %e, "deck read failed");
                Err(ClientError::DeckLoad { path: path.into() })
            }
        }
    }
}
