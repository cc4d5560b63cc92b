pub mod binding;
pub mod error;
pub mod logger;
pub mod reader;
pub mod record;
pub mod source;

pub use crate::error::{Error, Result, Stage};
pub use binding::{ColumnBinding, lookup_tag, parse_binding};
pub use reader::{BoundField, Decoder, DecoderOptions, HeaderIndex, PartialRead, read_all};
pub use record::{Coerce, FieldDescriptor, Record};
pub use source::{RecordSource, RowsSource};

#[cfg(feature = "derive")]
pub use csvrow_derive::Record;

pub use csv::StringRecord;
