use std::collections::{BTreeMap, HashMap};
use std::fmt;

use csv::StringRecord;

use crate::binding::{ColumnBinding, parse_binding};
use crate::logger::log_warn;
use crate::record::{FieldDescriptor, Record};

/// A column binding together with the function that writes into its field.
pub struct BoundField<T> {
    binding: ColumnBinding,
    assign: fn(&mut T, &str),
}

impl<T> BoundField<T> {
    #[must_use]
    pub const fn binding(&self) -> &ColumnBinding {
        &self.binding
    }

    pub(crate) fn assign(&self, row: &mut T, raw: &str) {
        (self.assign)(row, raw);
    }
}

impl<T> fmt::Debug for BoundField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundField")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

/// Mapping from 0-based column position to the field it populates.
///
/// Columns without a bound field are absent, as are annotated fields whose
/// column is not in the header.
pub struct HeaderIndex<T> {
    columns: BTreeMap<usize, BoundField<T>>,
}

impl<T: Record> HeaderIndex<T> {
    /// Builds the index for `T` from a header record.
    #[must_use]
    pub fn resolve(header: &StringRecord) -> Self {
        Self::resolve_fields(header, &T::fields(), false)
    }

    pub(crate) fn resolve_fields(
        header: &StringRecord,
        fields: &[FieldDescriptor<T>],
        warn_unmatched: bool,
    ) -> Self {
        let mut name_to_index: HashMap<&str, usize> = HashMap::with_capacity(header.len());
        for (index, name) in header.iter().enumerate() {
            // Later duplicates replace earlier positions.
            if let Some(previous) = name_to_index.insert(name, index)
                && warn_unmatched
            {
                log_warn(&format!(
                    "header column '{name}' appears at positions {previous} and {index}; using {index}"
                ));
            }
        }

        let mut columns = BTreeMap::new();
        for descriptor in fields {
            let Some(binding) = parse_binding(descriptor) else {
                continue;
            };
            let Some(&index) = name_to_index.get(binding.column_name()) else {
                if warn_unmatched {
                    log_warn(&format!(
                        "field '{}' binds to column '{}' which is not in the header",
                        binding.field(),
                        binding.column_name()
                    ));
                }
                continue;
            };
            columns.insert(
                index,
                BoundField {
                    binding,
                    assign: descriptor.assign_fn(),
                },
            );
        }
        Self { columns }
    }
}

impl<T> HeaderIndex<T> {
    #[must_use]
    pub fn get(&self, column: usize) -> Option<&BoundField<T>> {
        self.columns.get(&column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Bound columns in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BoundField<T>)> {
        self.columns.iter().map(|(index, bound)| (*index, bound))
    }

    /// Populates `row` from one raw record. Bound columns past the end of a
    /// short record are skipped.
    pub(crate) fn apply(&self, record: &StringRecord, row: &mut T) {
        for (index, bound) in &self.columns {
            if let Some(raw) = record.get(*index) {
                bound.assign(row, raw);
            }
        }
    }
}

impl<T> fmt::Debug for HeaderIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.columns.iter()).finish()
    }
}
