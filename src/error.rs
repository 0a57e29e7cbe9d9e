//! Error types for rs-placereviews.
//!
//! Only host-side failures surface here: an unusable configuration, a
//! document handle that stopped responding, or a sink that could not accept
//! a batch. Data-quality problems (malformed cards, unrated cards, unparseable
//! dates) are absorbed by the extraction pipeline and reported through
//! [`SessionReport`](crate::SessionReport) counters instead.

/// Error type for extraction sessions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The session configuration cannot be used (empty target list, zero cap, bad URL).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host document handle failed to navigate, snapshot, click or scroll.
    #[error("Document driver failed: {0}")]
    Driver(String),

    /// A batch could not be encoded for the sink.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The sink could not write a batch.
    #[error("Sink I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
