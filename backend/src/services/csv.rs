//! CSV row encoding for exports.
//!
//! Fields containing a comma, a double quote or a line break are quoted and
//! inner quotes doubled, so any standard CSV reader recovers the original
//! string forms. Typing is lost, as usual for CSV.

use std::borrow::Cow;
use std::fmt;

/// One scalar CSV field.
#[derive(Debug, Clone, PartialEq)]
pub enum CsvValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl CsvValue {
    /// Natural string form of the value (before escaping).
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            CsvValue::Null => Cow::Borrowed(""),
            CsvValue::Int(v) => Cow::Owned(v.to_string()),
            CsvValue::UInt(v) => Cow::Owned(v.to_string()),
            CsvValue::Float(v) => Cow::Owned(v.to_string()),
            CsvValue::Text(v) => Cow::Borrowed(v.as_str()),
        }
    }
}

impl fmt::Display for CsvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<i64> for CsvValue {
    fn from(v: i64) -> Self {
        CsvValue::Int(v)
    }
}

impl From<u64> for CsvValue {
    fn from(v: u64) -> Self {
        CsvValue::UInt(v)
    }
}

impl From<i32> for CsvValue {
    fn from(v: i32) -> Self {
        CsvValue::Int(v.into())
    }
}

impl From<f64> for CsvValue {
    fn from(v: f64) -> Self {
        CsvValue::Float(v)
    }
}

impl From<String> for CsvValue {
    fn from(v: String) -> Self {
        CsvValue::Text(v)
    }
}

impl From<&str> for CsvValue {
    fn from(v: &str) -> Self {
        CsvValue::Text(v.to_string())
    }
}

impl<T: Into<CsvValue>> From<Option<T>> for CsvValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CsvValue::Null)
    }
}

fn needs_quoting(field: &str) -> bool {
    field.contains([',', '"', '\n', '\r'])
}

/// Escape a single rendered field.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if needs_quoting(field) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Encode one row as a CSV line (no line terminator).
pub fn encode_row(values: &[CsvValue]) -> String {
    values
        .iter()
        .map(|value| escape_field(&value.render()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Encode a header followed by data rows, joined with `\n`.
pub fn encode_table<I>(header: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<CsvValue>>,
{
    let header_row: Vec<CsvValue> = header.iter().map(|h| CsvValue::from(*h)).collect();
    std::iter::once(encode_row(&header_row))
        .chain(rows.into_iter().map(|row| encode_row(&row)))
        .collect::<Vec<_>>()
        .join("\n")
}
