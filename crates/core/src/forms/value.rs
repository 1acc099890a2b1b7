//! Field names, kinds and values.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Name of a form field.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName(String);

impl FieldName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::borrow::Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for FieldName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// The type a field's value must have once coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Boolean,
}

impl FieldKind {
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "a number",
            FieldKind::Date => "a date (YYYY-MM-DD)",
            FieldKind::Boolean => "true or false",
        }
    }
}

/// Current value of a field.
///
/// `Empty` is the "nothing chosen yet" state of every field, including enumerated selects that
/// were reset by a cascade.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Boolean(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Convert raw user input into a value of `kind`.
    ///
    /// Blank input becomes `Empty`. Input that cannot be read as `kind` is kept as `Text` so the
    /// kind check reports it instead of it being silently dropped.
    pub fn coerce(kind: FieldKind, raw: &str) -> Self {
        let trimmed = raw.trim();
        match kind {
            FieldKind::Text if raw.is_empty() => FieldValue::Empty,
            FieldKind::Text => FieldValue::Text(raw.to_owned()),
            _ if trimmed.is_empty() => FieldValue::Empty,
            FieldKind::Number => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => FieldValue::Number(n),
                _ => FieldValue::Text(raw.to_owned()),
            },
            FieldKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(FieldValue::Date)
                .unwrap_or_else(|_| FieldValue::Text(raw.to_owned())),
            FieldKind::Boolean => match trimmed {
                "true" => FieldValue::Boolean(true),
                "false" => FieldValue::Boolean(false),
                _ => FieldValue::Text(raw.to_owned()),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Kind of the held value, `None` when empty.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Empty => None,
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Number(_) => Some(FieldKind::Number),
            FieldValue::Date(_) => Some(FieldKind::Date),
            FieldValue::Boolean(_) => Some(FieldKind::Boolean),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Empty => serializer.serialize_none(),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_parses_numbers_and_keeps_garbage_as_text() {
        assert_eq!(FieldValue::coerce(FieldKind::Number, " 170 "), FieldValue::Number(170.0));
        assert_eq!(FieldValue::coerce(FieldKind::Number, "65.5"), FieldValue::Number(65.5));
        assert_eq!(
            FieldValue::coerce(FieldKind::Number, "tall"),
            FieldValue::text("tall")
        );
        assert_eq!(FieldValue::coerce(FieldKind::Number, "NaN"), FieldValue::text("NaN"));
    }

    #[test]
    fn coerce_blank_is_empty() {
        assert_eq!(FieldValue::coerce(FieldKind::Number, "  "), FieldValue::Empty);
        assert_eq!(FieldValue::coerce(FieldKind::Date, ""), FieldValue::Empty);
        assert_eq!(FieldValue::coerce(FieldKind::Text, ""), FieldValue::Empty);
    }

    #[test]
    fn coerce_dates_and_booleans() {
        let date = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
        assert_eq!(FieldValue::coerce(FieldKind::Date, "1990-05-17"), FieldValue::Date(date));
        assert_eq!(
            FieldValue::coerce(FieldKind::Date, "17/05/1990"),
            FieldValue::text("17/05/1990")
        );
        assert_eq!(FieldValue::coerce(FieldKind::Boolean, "true"), FieldValue::Boolean(true));
    }

    #[test]
    fn serialises_as_plain_json_values() {
        let date = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
        let json = serde_json::to_string(&vec![
            FieldValue::Empty,
            FieldValue::text("北京市"),
            FieldValue::Number(170.0),
            FieldValue::Date(date),
            FieldValue::Boolean(false),
        ])
        .expect("serialise");
        assert_eq!(json, r#"[null,"北京市",170.0,"1990-05-17",false]"#);
    }
}
