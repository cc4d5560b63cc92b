use std::fmt;
use std::io;
use std::sync::Arc;

/// Result type used across the typed CSV decoder.
pub type Result<T> = std::result::Result<T, Error>;

/// High-level error type surfaced by the decoder.
///
/// Reaching the end of the input is not an error: [`crate::Decoder::read`]
/// reports it as `Ok(None)`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The source failed before a header row could be read.
    ///
    /// The cause is shared so a decoder can hand the same failure back on
    /// every later read.
    #[error("reading header row: {source}")]
    Header {
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The source failed while reading a data row.
    #[error("reading row {index}: {source}")]
    Row {
        index: u64,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// I/O failure while opening the underlying file.
    #[error(transparent)]
    Io(Arc<io::Error>),
}

impl Error {
    /// Step of the decoder that produced this error, if it came from the source.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Header { .. } => Some(Stage::Header),
            Self::Row { index, .. } => Some(Stage::Row { index: *index }),
            Self::Io(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// Decoding step used for diagnostic reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Header,
    Row { index: u64 },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header row"),
            Self::Row { index } => write!(f, "row {index}"),
        }
    }
}
