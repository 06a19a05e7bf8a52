//! Error types for rtnetlink decoding and streaming.

use std::io;

/// Result type for ifwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while receiving or decoding rtnetlink messages.
///
/// Only transport failures ever reach the caller of the event stream;
/// malformed messages and unrecognized attributes are recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Message or attribute was truncated.
    #[error("truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Declared length.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// Invalid interface-name glob pattern.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),
}
