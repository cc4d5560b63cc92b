//! Column bindings declared through field annotations.
//!
//! A field's metadata is a space-separated list of `key:"value"` pairs. The
//! value under the `csv` key names the header column the field binds to and
//! is matched verbatim against header text.

use std::str::Chars;

use crate::record::FieldDescriptor;

/// Annotation key that declares a column binding.
pub const TAG_KEY: &str = "csv";

/// Association between a header column name and a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    column_name: String,
    field: &'static str,
}

impl ColumnBinding {
    #[must_use]
    pub fn new(column_name: impl Into<String>, field: &'static str) -> Self {
        Self {
            column_name: column_name.into(),
            field,
        }
    }

    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }
}

/// Derives the column binding of a field, if it carries a `csv` annotation.
///
/// Fields without the annotation are not an error; they just never bind.
#[must_use]
pub fn parse_binding<T>(descriptor: &FieldDescriptor<T>) -> Option<ColumnBinding> {
    let column_name = lookup_tag(descriptor.metadata(), TAG_KEY)?;
    Some(ColumnBinding::new(column_name, descriptor.name()))
}

/// Returns the unquoted value stored under `key` in a struct-tag string.
///
/// Scanning stops at the first malformed pair, so anything after it is
/// unreachable.
#[must_use]
pub fn lookup_tag(metadata: &str, key: &str) -> Option<String> {
    let mut rest = metadata;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_len = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\x7f')
            .unwrap_or(rest.len());
        if name_len == 0 {
            return None;
        }
        let (name, after_name) = rest.split_at(name_len);
        let quoted = after_name.strip_prefix(':')?;
        if !quoted.starts_with('"') {
            return None;
        }

        let end = closing_quote(quoted)?;
        let (literal, remainder) = quoted.split_at(end + 1);
        if name == key {
            return unquote(literal);
        }
        rest = remainder;
    }
}

/// Byte offset of the quote closing the literal that opens `quoted`.
fn closing_quote(quoted: &str) -> Option<usize> {
    let bytes = quoted.as_bytes();
    let mut pos = 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => return Some(pos),
            _ => pos += 1,
        }
    }
    None
}

/// Unescapes a double-quoted literal.
///
/// Accepts the Go string escapes: `\a \b \f \n \r \t \v \\ \"`, octal
/// `\NNN`, hex `\xNN` and the code points `\uNNNN` and `\UNNNNNNNN`. Octal and
/// hex escapes produce single bytes, and the unescaped bytes must form valid
/// UTF-8.
fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            push_char(&mut out, c);
            continue;
        }
        match chars.next()? {
            '"' => out.push(b'"'),
            '\\' => out.push(b'\\'),
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0b),
            'x' => out.push(u8::try_from(digits(&mut chars, 16, 0, 2)?).ok()?),
            'u' => push_char(&mut out, char::from_u32(digits(&mut chars, 16, 0, 4)?)?),
            'U' => push_char(&mut out, char::from_u32(digits(&mut chars, 16, 0, 8)?)?),
            first @ '0'..='7' => {
                let value = digits(&mut chars, 8, first.to_digit(8)?, 2)?;
                out.push(u8::try_from(value).ok()?);
            }
            _ => return None,
        }
    }
    String::from_utf8(out).ok()
}

/// Folds exactly `count` more digits in `radix` onto `seed`.
fn digits(chars: &mut Chars<'_>, radix: u32, seed: u32, count: usize) -> Option<u32> {
    (0..count).try_fold(seed, |acc, _| {
        Some(acc * radix + chars.next()?.to_digit(radix)?)
    })
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Row {
        name: String,
    }

    fn assign_name(row: &mut Row, raw: &str) {
        row.name = raw.to_owned();
    }

    #[test]
    fn binding_uses_annotation_value_verbatim() {
        let descriptor = FieldDescriptor::new("name", r#"csv:" First Name ""#, assign_name);
        let binding = parse_binding(&descriptor).unwrap();
        assert_eq!(binding.column_name(), " First Name ");
        assert_eq!(binding.field(), "name");
    }

    #[test]
    fn missing_annotation_yields_no_binding() {
        let descriptor = FieldDescriptor::new("name", "", assign_name);
        assert_eq!(parse_binding(&descriptor), None);

        let descriptor = FieldDescriptor::new("name", r#"json:"name""#, assign_name);
        assert_eq!(parse_binding(&descriptor), None);
    }

    #[test]
    fn empty_annotation_binds_to_empty_column_name() {
        let descriptor = FieldDescriptor::new("name", r#"csv:"""#, assign_name);
        let binding = parse_binding(&descriptor).unwrap();
        assert_eq!(binding.column_name(), "");
    }

    #[test]
    fn commas_are_not_split() {
        assert_eq!(
            lookup_tag(r#"csv:"City,omitempty""#, "csv").as_deref(),
            Some("City,omitempty")
        );
    }

    #[test]
    fn lookup_skips_other_keys() {
        let metadata = r#"json:"email" csv:"E-mail Address" db:"email""#;
        assert_eq!(lookup_tag(metadata, "csv").as_deref(), Some("E-mail Address"));
        assert_eq!(lookup_tag(metadata, "db").as_deref(), Some("email"));
        assert_eq!(lookup_tag(metadata, "xml"), None);
    }

    #[test]
    fn escaped_quotes_are_unescaped() {
        let metadata = r#"csv:"Height \"cm\"" note:"a\\b""#;
        assert_eq!(lookup_tag(metadata, "csv").as_deref(), Some(r#"Height "cm""#));
        assert_eq!(lookup_tag(metadata, "note").as_deref(), Some(r"a\b"));
    }

    #[test]
    fn numeric_escapes_decode_to_text() {
        assert_eq!(lookup_tag(r#"csv:"Caf\u00e9""#, "csv").as_deref(), Some("Café"));
        assert_eq!(lookup_tag(r#"csv:"\x41ge""#, "csv").as_deref(), Some("Age"));
        assert_eq!(lookup_tag(r#"csv:"\101ge""#, "csv").as_deref(), Some("Age"));
        assert_eq!(lookup_tag(r#"csv:"\U0001F600""#, "csv").as_deref(), Some("\u{1F600}"));
        assert_eq!(lookup_tag(r#"csv:"Caf\xc3\xa9""#, "csv").as_deref(), Some("Café"));
        assert_eq!(lookup_tag(r#"csv:"a\000b""#, "csv").as_deref(), Some("a\0b"));
        assert_eq!(lookup_tag(r#"csv:"\a\b\f\v""#, "csv").as_deref(), Some("\x07\x08\x0c\x0b"));
    }

    #[test]
    fn invalid_escapes_yield_no_value() {
        // Too few digits, a surrogate, an octal byte above 255 and a lone
        // byte that is not UTF-8.
        assert_eq!(lookup_tag(r#"csv:"\u12""#, "csv"), None);
        assert_eq!(lookup_tag(r#"csv:"\uD800""#, "csv"), None);
        assert_eq!(lookup_tag(r#"csv:"\400""#, "csv"), None);
        assert_eq!(lookup_tag(r#"csv:"\xff""#, "csv"), None);
        assert_eq!(lookup_tag(r#"csv:"\0""#, "csv"), None);
        assert_eq!(lookup_tag(r#"csv:"it\'s""#, "csv"), None);
    }

    #[test]
    fn malformed_metadata_stops_the_scan() {
        assert_eq!(lookup_tag(r#"csv"Name""#, "csv"), None);
        assert_eq!(lookup_tag(r#"csv:Name"#, "csv"), None);
        assert_eq!(lookup_tag(r#"csv:"unterminated"#, "csv"), None);
        assert_eq!(lookup_tag(r#"bad csv:"Name""#, "csv"), None);
        assert_eq!(lookup_tag(r#"csv:"bad \q escape""#, "csv"), None);
    }
}
