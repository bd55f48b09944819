//! Caller-supplied field values
//!
//! Values are untyped at the boundary: a caller may hand over raw text for
//! any field, or a natively typed value when it has one. Checking the shape
//! against the declared kind is the validator's job, not this module's.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::schema::{FieldKind, Schema};

/// Errors that can occur when loading field values
#[derive(Error, Debug)]
pub enum ValuesError {
    #[error("Failed to read values file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse values TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("value for '{name}' is a {found}; expected a string, number, boolean, date or array of scalars")]
    Unsupported { name: String, found: String },
    #[error("invalid value assignment '{pair}': expected KEY=VALUE")]
    InvalidPair { pair: String },
}

/// A single supplied value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Whole number kept exact; TOML integers land here
    Integer(i64),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// Build a list value from anything yielding strings
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Text form of a scalar value; `None` for lists
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Number(n) => Some(format_number(*n)),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::List(_) => None,
        }
    }

    /// Short name of the value's shape, for diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) | FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "boolean",
            FieldValue::List(_) => "list",
        }
    }

    /// Convert a TOML value; arrays may only hold scalars
    pub(crate) fn from_toml(name: &str, value: toml::Value) -> Result<Self, ValuesError> {
        match value {
            toml::Value::String(s) => Ok(FieldValue::Text(s)),
            toml::Value::Integer(i) => Ok(FieldValue::Integer(i)),
            toml::Value::Float(f) => Ok(FieldValue::Number(f)),
            toml::Value::Boolean(b) => Ok(FieldValue::Bool(b)),
            toml::Value::Datetime(dt) => Ok(FieldValue::Text(dt.to_string())),
            toml::Value::Array(items) => items
                .into_iter()
                .map(|item| match FieldValue::from_toml(name, item)? {
                    FieldValue::List(_) => Err(ValuesError::Unsupported {
                        name: name.to_string(),
                        found: "nested array".to_string(),
                    }),
                    scalar => Ok(scalar.scalar_text().unwrap_or_default()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::List),
            toml::Value::Table(_) => Err(ValuesError::Unsupported {
                name: name.to_string(),
                found: "table".to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
            scalar => write!(f, "{}", scalar.scalar_text().unwrap_or_default()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Print a number without a trailing `.0` when it is integral
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Read-only mapping from field name to supplied value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    values: HashMap<String, FieldValue>,
}

impl FieldValues {
    /// Create an empty value set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, replacing any earlier value for the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Look up a value by field name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Supplied field names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` on top of `self`; values in `other` win
    pub fn merged(mut self, other: FieldValues) -> Self {
        self.values.extend(other.values);
        self
    }

    /// Load values from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ValuesError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load values from a TOML document of top-level `key = value` pairs
    pub fn from_toml_str(content: &str) -> Result<Self, ValuesError> {
        let table: toml::Table = toml::from_str(content)?;
        table
            .into_iter()
            .map(|(name, value)| {
                let value = FieldValue::from_toml(&name, value)?;
                Ok::<_, ValuesError>((name, value))
            })
            .collect()
    }

    /// Parse `KEY=VALUE` assignments; every value is kept as raw text
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ValuesError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|pair| {
                let pair = pair.as_ref();
                match pair.split_once('=') {
                    Some((key, value)) if !key.trim().is_empty() => Ok((
                        key.trim().to_string(),
                        FieldValue::Text(value.to_string()),
                    )),
                    _ => Err(ValuesError::InvalidPair {
                        pair: pair.to_string(),
                    }),
                }
            })
            .collect()
    }

    /// Turn raw text supplied for list fields into lists
    ///
    /// Items are split on `separator` with surrounding whitespace trimmed,
    /// so `"a, b"` and `"a,b"` both give `[a, b]` for a `", "` separator.
    /// Empty text gives an empty list. Other fields are left alone.
    pub fn split_lists(mut self, schema: &Schema, separator: &str) -> Self {
        let delimiter = separator.trim();
        for field in schema.fields() {
            if field.kind != FieldKind::List {
                continue;
            }
            if let Some(FieldValue::Text(raw)) = self.values.get(&field.name) {
                let items: Vec<String> = if delimiter.is_empty() {
                    raw.split_whitespace().map(str::to_string).collect()
                } else {
                    raw.split(delimiter)
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect()
                };
                self.values
                    .insert(field.name.clone(), FieldValue::List(items));
            }
        }
        self
    }
}

impl<K, V> FromIterator<(K, V)> for FieldValues
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_and_get() {
        let values = FieldValues::new()
            .with("status", "review")
            .with("id", 7i64)
            .with("public", true);
        assert_eq!(values.get("status"), Some(&FieldValue::Text("review".into())));
        assert_eq!(values.get("id"), Some(&FieldValue::Integer(7)));
        assert_eq!(values.get("public"), Some(&FieldValue::Bool(true)));
        assert_eq!(values.get("missing"), None);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_later_value_wins() {
        let values = FieldValues::new().with("a", "1").with("a", "2");
        assert_eq!(values.get("a"), Some(&FieldValue::Text("2".into())));
    }

    #[test]
    fn test_from_toml_str() {
        let values = FieldValues::from_toml_str(
            r#"
title = "Caching"
id = 12
ratio = 0.5
draft = false
tags = ["api", "cache"]
decided = 2024-03-01
"#,
        )
        .expect("Should parse");

        assert_eq!(values.get("title"), Some(&FieldValue::Text("Caching".into())));
        assert_eq!(values.get("id"), Some(&FieldValue::Integer(12)));
        assert_eq!(values.get("ratio"), Some(&FieldValue::Number(0.5)));
        assert_eq!(values.get("draft"), Some(&FieldValue::Bool(false)));
        assert_eq!(values.get("tags"), Some(&FieldValue::list(["api", "cache"])));
        assert_eq!(values.get("decided"), Some(&FieldValue::Text("2024-03-01".into())));
    }

    #[test]
    fn test_large_integers_stay_exact() {
        let values = FieldValues::from_toml_str("id = 9007199254740993").expect("Should parse");
        assert_eq!(
            values.get("id"),
            Some(&FieldValue::Integer(9_007_199_254_740_993))
        );

        let schema = crate::Schema::new(vec![crate::FieldSpec::number("id")], "{{id}}")
            .expect("Should build");
        assert_eq!(
            crate::render(&schema, &values).document(),
            Some("9007199254740993")
        );
        assert_eq!(
            crate::render(&schema, &FieldValues::new().with("id", i64::MAX)).document(),
            Some("9223372036854775807")
        );
    }

    #[test]
    fn test_from_toml_mixed_array_becomes_text() {
        let values = FieldValues::from_toml_str("ports = [80, 443]").expect("Should parse");
        assert_eq!(values.get("ports"), Some(&FieldValue::list(["80", "443"])));
    }

    #[test]
    fn test_from_toml_rejects_tables() {
        let result = FieldValues::from_toml_str("[owner]\nname = \"x\"");
        assert!(matches!(result, Err(ValuesError::Unsupported { .. })));
    }

    #[test]
    fn test_from_toml_rejects_nested_arrays() {
        let result = FieldValues::from_toml_str("grid = [[1, 2], [3]]");
        assert!(matches!(result, Err(ValuesError::Unsupported { .. })));
    }

    #[test]
    fn test_from_pairs() {
        let values = FieldValues::from_pairs(["status=draft", "note=a=b", "empty="])
            .expect("Should parse");
        assert_eq!(values.get("status"), Some(&FieldValue::Text("draft".into())));
        assert_eq!(values.get("note"), Some(&FieldValue::Text("a=b".into())));
        assert_eq!(values.get("empty"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn test_split_lists_for_list_fields() {
        let schema = Schema::new(
            vec![
                crate::FieldSpec::list("tags"),
                crate::FieldSpec::list("owners"),
                crate::FieldSpec::string("title"),
            ],
            "",
        )
        .expect("Should build");
        let values = FieldValues::from_pairs(["tags=api, cache,,v2", "owners=", "title=a, b"])
            .expect("Should parse")
            .split_lists(&schema, ", ");

        assert_eq!(values.get("tags"), Some(&FieldValue::list(["api", "cache", "v2"])));
        assert_eq!(values.get("owners"), Some(&FieldValue::List(vec![])));
        assert_eq!(values.get("title"), Some(&FieldValue::Text("a, b".into())));
        assert!(crate::validate(&schema, &values).is_empty());

        let spaced = FieldValues::from_pairs(["tags=a  b c"])
            .expect("Should parse")
            .split_lists(&schema, " ");
        assert_eq!(spaced.get("tags"), Some(&FieldValue::list(["a", "b", "c"])));
    }

    #[test]
    fn test_from_pairs_invalid() {
        assert!(matches!(
            FieldValues::from_pairs(["novalue"]),
            Err(ValuesError::InvalidPair { .. })
        ));
        assert!(matches!(
            FieldValues::from_pairs(["=x"]),
            Err(ValuesError::InvalidPair { .. })
        ));
    }

    #[test]
    fn test_merged_overrides() {
        let base = FieldValues::new().with("a", "1").with("b", "2");
        let merged = base.merged(FieldValues::new().with("b", "3"));
        assert_eq!(merged.get("a"), Some(&FieldValue::Text("1".into())));
        assert_eq!(merged.get("b"), Some(&FieldValue::Text("3".into())));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::list(["a", "b"]).to_string(), "[a, b]");
        assert_eq!(FieldValue::Number(1.0).to_string(), "1");
    }
}
