//! Defines the error types that this crate uses.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io;

/// The error type for reading and writing entries of a [`KeyValueStore`].
///
/// [`KeyValueStore`]: crate::store::KeyValueStore
#[derive(Debug)]
pub enum StoreError {
    /// A [`std::io::Error`] encountered while accessing the backing storage.
    Io(io::Error),

    /// A [`serde_json::Error`] encountered while encoding or decoding the
    /// stored entries.
    Json(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let store_error = "store error:";

        match self {
            StoreError::Io(error) => write!(f, "{store_error} I/O error: {error}"),
            StoreError::Json(error) => write!(f, "{store_error} JSON error: {error}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Io(error) => Some(error),
            StoreError::Json(error) => Some(error),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(error: io::Error) -> Self {
        StoreError::Io(error)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Json(error)
    }
}
