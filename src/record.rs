use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Static description of one field of a record type.
///
/// `metadata` carries the field's annotations in struct-tag form, for
/// example `csv:"First Name"`. Fields without a `csv` entry are listed too
/// and simply never bind to a column.
pub struct FieldDescriptor<T> {
    name: &'static str,
    metadata: &'static str,
    assign: fn(&mut T, &str),
}

impl<T> FieldDescriptor<T> {
    #[must_use]
    pub const fn new(name: &'static str, metadata: &'static str, assign: fn(&mut T, &str)) -> Self {
        Self {
            name,
            metadata,
            assign,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn metadata(&self) -> &'static str {
        self.metadata
    }

    #[must_use]
    pub const fn assign_fn(&self) -> fn(&mut T, &str) {
        self.assign
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDescriptor<T> {}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// A record type that rows can be decoded into.
///
/// Usually implemented with `#[derive(Record)]`:
///
/// ```
/// use csvrow::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct Person {
///     #[csv("First Name")]
///     first_name: String,
///     #[csv("Email")]
///     email: String,
///     note: String,
/// }
///
/// let fields = Person::fields();
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields[0].metadata(), r#"csv:"First Name""#);
/// assert_eq!(fields[2].metadata(), "");
/// ```
pub trait Record: Default {
    /// Every field of the type, in declaration order.
    fn fields() -> Vec<FieldDescriptor<Self>>;
}

/// Assigns a raw cell into a field.
///
/// Only string-like targets take the value. Numeric, `bool` and `char`
/// targets accept the call and keep their current value, so an annotated
/// field of those types stays at its default.
pub trait Coerce {
    fn coerce(&mut self, raw: &str);
}

impl Coerce for String {
    fn coerce(&mut self, raw: &str) {
        self.clear();
        self.push_str(raw);
    }
}

impl Coerce for Box<str> {
    fn coerce(&mut self, raw: &str) {
        *self = Self::from(raw);
    }
}

impl Coerce for Arc<str> {
    fn coerce(&mut self, raw: &str) {
        *self = Self::from(raw);
    }
}

impl Coerce for Rc<str> {
    fn coerce(&mut self, raw: &str) {
        *self = Self::from(raw);
    }
}

impl Coerce for Cow<'static, str> {
    fn coerce(&mut self, raw: &str) {
        *self = Cow::Owned(raw.to_owned());
    }
}

macro_rules! impl_optional_coerce {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Coerce for Option<$ty> {
                fn coerce(&mut self, raw: &str) {
                    self.get_or_insert_with(<$ty>::default).coerce(raw);
                }
            }
        )*
    };
}

impl_optional_coerce!(String, Box<str>, Arc<str>, Rc<str>, Cow<'static, str>);

macro_rules! impl_ignored_coerce {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Coerce for $ty {
                fn coerce(&mut self, _raw: &str) {}
            }

            impl Coerce for Option<$ty> {
                fn coerce(&mut self, _raw: &str) {}
            }
        )*
    };
}

impl_ignored_coerce!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
