use std::fmt;

use crate::error::Error;
use crate::record::Record;
use crate::source::RecordSource;

use super::Decoder;

/// A bulk read that stopped on an error, with the rows decoded before it.
#[derive(thiserror::Error)]
#[error("read stopped after {} rows: {source}", .rows.len())]
pub struct PartialRead<T> {
    pub rows: Vec<T>,
    #[source]
    pub source: Error,
}

impl<T> fmt::Debug for PartialRead<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialRead")
            .field("rows", &self.rows.len())
            .field("source", &self.source)
            .finish()
    }
}

impl<T> PartialRead<T> {
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Error) {
        (self.rows, self.source)
    }
}

impl<T> From<PartialRead<T>> for Error {
    fn from(partial: PartialRead<T>) -> Self {
        partial.source
    }
}

/// Reads every remaining row of `decoder` in input order.
///
/// Reaching the end of the input completes the read successfully.
///
/// # Errors
///
/// Returns a [`PartialRead`] holding the rows read so far and the failure
/// that stopped the read.
pub fn read_all<T, S>(decoder: &mut Decoder<T, S>) -> Result<Vec<T>, PartialRead<T>>
where
    T: Record,
    S: RecordSource,
{
    let mut rows = Vec::new();
    loop {
        match decoder.read() {
            Ok(Some(row)) => rows.push(row),
            Ok(None) => return Ok(rows),
            Err(source) => return Err(PartialRead { rows, source }),
        }
    }
}
