use std::convert::Infallible;
use std::io;

use csv::StringRecord;

/// Producer of tokenized records: the next record as an ordered list of
/// strings, end-of-input, or a read failure.
pub trait RecordSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads the header record into `record`.
    ///
    /// Returns `Ok(false)` when the source holds no records at all.
    ///
    /// # Errors
    ///
    /// Returns the source's own failure.
    fn read_header(&mut self, record: &mut StringRecord) -> Result<bool, Self::Error> {
        self.read_record(record)
    }

    /// Reads the next data record into `record`.
    ///
    /// Returns `Ok(false)` at end-of-input.
    ///
    /// # Errors
    ///
    /// Returns the source's own failure.
    fn read_record(&mut self, record: &mut StringRecord) -> Result<bool, Self::Error>;
}

impl<R: io::Read> RecordSource for csv::Reader<R> {
    type Error = csv::Error;

    fn read_header(&mut self, record: &mut StringRecord) -> Result<bool, Self::Error> {
        if !self.has_headers() {
            return self.read_record(record);
        }
        // The tokenizer already split the first record off as its header.
        let headers = self.headers()?;
        if headers.is_empty() {
            return Ok(false);
        }
        record.clone_from(headers);
        Ok(true)
    }

    fn read_record(&mut self, record: &mut StringRecord) -> Result<bool, Self::Error> {
        Self::read_record(self, record)
    }
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    type Error = S::Error;

    fn read_header(&mut self, record: &mut StringRecord) -> Result<bool, Self::Error> {
        (**self).read_header(record)
    }

    fn read_record(&mut self, record: &mut StringRecord) -> Result<bool, Self::Error> {
        (**self).read_record(record)
    }
}

/// In-memory source over already tokenized rows. The first row is the header.
#[derive(Debug, Clone)]
pub struct RowsSource<I> {
    rows: I,
}

impl<I> RowsSource<I> {
    pub fn new<T>(rows: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl<I, R, F> RecordSource for RowsSource<I>
where
    I: Iterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    type Error = Infallible;

    fn read_record(&mut self, record: &mut StringRecord) -> Result<bool, Self::Error> {
        let Some(row) = self.rows.next() else {
            return Ok(false);
        };
        record.clear();
        for field in row {
            record.push_field(field.as_ref());
        }
        Ok(true)
    }
}
