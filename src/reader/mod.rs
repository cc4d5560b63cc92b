mod bulk;
mod header;
mod options;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{Reader, StringRecord};

use crate::error::{Error, Result};
use crate::record::Record;
use crate::source::RecordSource;

pub use bulk::{PartialRead, read_all};
pub use header::{BoundField, HeaderIndex};
pub use options::DecoderOptions;

/// Outcome of the one-time header resolution.
enum HeaderState<T> {
    Pending,
    /// The source held no header record.
    Exhausted,
    /// Reading the header failed; the cause is handed back on every read.
    Failed(Arc<dyn std::error::Error + Send + Sync>),
    Ready(HeaderIndex<T>),
}

/// Decodes records of a source into values of `T`.
///
/// The first call to [`Decoder::read`] consumes the header record and binds
/// header columns to the annotated fields of `T`. That resolution happens at
/// most once; its outcome, success or failure, is kept for the lifetime of
/// the decoder.
///
/// ```
/// use csvrow::{Decoder, Record};
///
/// #[derive(Debug, Default, PartialEq, Record)]
/// struct City {
///     #[csv("Name")]
///     name: String,
///     #[csv("State")]
///     state: String,
/// }
///
/// let data = "State,Name,Population\nCA,Los Angeles,3898747\n";
/// let mut decoder = Decoder::<City, _>::from_reader(data.as_bytes());
///
/// let city = decoder.read()?.expect("one data row");
/// assert_eq!(city.name, "Los Angeles");
/// assert_eq!(city.state, "CA");
/// assert!(decoder.read()?.is_none());
/// # Ok::<(), csvrow::Error>(())
/// ```
pub struct Decoder<T, S> {
    source: S,
    header: HeaderState<T>,
    record: StringRecord,
    rows_read: u64,
    warn_unmatched: bool,
    failed: bool,
}

impl<T: Record> Decoder<T, Reader<File>> {
    /// Opens a CSV file from disk with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &DecoderOptions::default())
    }

    /// Opens a CSV file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &DecoderOptions) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader_with(file, options))
    }
}

impl<T: Record, R: Read> Decoder<T, Reader<R>> {
    /// Tokenizes `reader` as comma-separated text with default options.
    pub fn from_reader(reader: R) -> Self {
        Self::from_reader_with(reader, &DecoderOptions::default())
    }

    pub fn from_reader_with(reader: R, options: &DecoderOptions) -> Self {
        let mut decoder = Self::new(options.build_reader(reader));
        decoder.warn_unmatched = options.warn_unmatched();
        decoder
    }
}

impl<T: Record, S: RecordSource> Decoder<T, S> {
    /// Binds a decoder to an already tokenized source. Nothing is read until
    /// the first call to [`Decoder::read`].
    pub fn new(source: S) -> Self {
        Self {
            source,
            header: HeaderState::Pending,
            record: StringRecord::new(),
            rows_read: 0,
            warn_unmatched: false,
            failed: false,
        }
    }

    /// Decodes the next data row.
    ///
    /// Returns `Ok(None)` once the input is exhausted, including when the
    /// input does not even contain a header row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Header`] if the header row could not be read (again
    /// on every later call) and [`Error::Row`] if a data row could not be
    /// read.
    pub fn read(&mut self) -> Result<Option<T>> {
        if !self.resolve_header()? {
            return Ok(None);
        }

        let has_record = self
            .source
            .read_record(&mut self.record)
            .map_err(|err| Error::Row {
                index: self.rows_read,
                source: Arc::new(err),
            })?;
        if !has_record {
            return Ok(None);
        }
        let HeaderState::Ready(index) = &self.header else {
            return Ok(None);
        };

        let mut row = T::default();
        index.apply(&self.record, &mut row);
        self.rows_read += 1;
        Ok(Some(row))
    }

    /// Runs header resolution on the first call and reports whether data rows
    /// can be decoded.
    fn resolve_header(&mut self) -> Result<bool> {
        if matches!(self.header, HeaderState::Pending) {
            self.header = match self.source.read_header(&mut self.record) {
                Ok(true) => HeaderState::Ready(HeaderIndex::resolve_fields(
                    &self.record,
                    &T::fields(),
                    self.warn_unmatched,
                )),
                Ok(false) => HeaderState::Exhausted,
                Err(err) => HeaderState::Failed(Arc::new(err)),
            };
        }

        match &self.header {
            HeaderState::Ready(_) => Ok(true),
            HeaderState::Pending | HeaderState::Exhausted => Ok(false),
            HeaderState::Failed(cause) => Err(Error::Header {
                source: Arc::clone(cause),
            }),
        }
    }
}

impl<T, S> Decoder<T, S> {
    /// The resolved header index, once the header has been read successfully.
    pub const fn header_index(&self) -> Option<&HeaderIndex<T>> {
        match &self.header {
            HeaderState::Ready(index) => Some(index),
            _ => None,
        }
    }

    /// Number of data rows decoded so far.
    pub const fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub const fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<T: Record, S: RecordSource> Iterator for Decoder<T, S> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read() {
            Ok(row) => row.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
