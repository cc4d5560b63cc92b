use std::io::Read;

use csv::{Reader, ReaderBuilder, Trim};

/// Configures the tokenizer built by [`super::Decoder::from_reader_with`]
/// and the decoder's header diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct DecoderOptions {
    delimiter: u8,
    quote: u8,
    flexible: bool,
    trim: bool,
    warn_unmatched: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            flexible: false,
            trim: false,
            warn_unmatched: false,
        }
    }

    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub const fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Accept rows whose field count differs from the header's.
    ///
    /// Off by default, in which case a ragged row fails that read.
    #[must_use]
    pub const fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Trim surrounding whitespace from every field, header included.
    #[must_use]
    pub const fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Log a warning for each annotated field whose column is missing and
    /// for each duplicated header name.
    #[must_use]
    pub const fn with_warn_unmatched(mut self, warn: bool) -> Self {
        self.warn_unmatched = warn;
        self
    }

    pub(crate) const fn warn_unmatched(&self) -> bool {
        self.warn_unmatched
    }

    pub(crate) fn build_reader<R: Read>(&self, reader: R) -> Reader<R> {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .flexible(self.flexible)
            .trim(if self.trim { Trim::All } else { Trim::None });
        builder.from_reader(reader)
    }
}
