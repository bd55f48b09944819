//! Field declarations

use std::fmt;

use crate::values::FieldValue;

/// The declared type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text
    String,
    /// One of a fixed set of values, matched case-sensitively
    Enum(Vec<String>),
    /// A finite number
    Number,
    /// `true` or `false`
    Boolean,
    /// A sequence of strings
    List,
    /// An ISO-8601 calendar date (`YYYY-MM-DD`)
    Date,
}

impl FieldKind {
    /// Build an enum kind from its allowed values
    pub fn enumeration<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum(allowed.into_iter().map(Into::into).collect())
    }

    /// Parse a kind keyword as written in front matter
    ///
    /// `enum` is not accepted here since it needs its allowed values; use
    /// [`FieldKind::enumeration`].
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" | "text" => Some(FieldKind::String),
            "number" => Some(FieldKind::Number),
            "boolean" | "bool" => Some(FieldKind::Boolean),
            "list" | "list-of-string" => Some(FieldKind::List),
            "date" => Some(FieldKind::Date),
            _ => None,
        }
    }

    /// Allowed values for enum kinds
    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            FieldKind::Enum(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Enum(_) => "enum",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::List => "list",
            FieldKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// One declared field of a schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<FieldValue>,
    pub description: Option<String>,
}

impl FieldSpec {
    /// Create an optional field with no default
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            description: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldKind::enumeration(allowed))
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the value used when the field is absent
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attach a human-readable description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Field names follow the same rule as placeholder identifiers
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}
