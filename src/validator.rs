//! Validation of supplied values against a schema
//!
//! Validation never fails: every problem is returned as a [`Violation`], in
//! schema declaration order, so one pass reports everything a person filling
//! in a template has to fix.

use std::fmt;

use chrono::NaiveDate;
use tracing::debug;

use crate::schema::{FieldKind, Schema};
use crate::values::{FieldValue, FieldValues};

/// Why a supplied value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A required field has no supplied value
    MissingRequired,
    /// Supplied value is not in the field's allowed set
    InvalidEnumValue,
    /// Supplied value's shape does not match the declared kind
    TypeMismatch,
    /// Supplied date is not an ISO-8601 calendar date
    InvalidDateFormat,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingRequired => write!(f, "missing required value"),
            ViolationKind::InvalidEnumValue => write!(f, "invalid enum value"),
            ViolationKind::TypeMismatch => write!(f, "type mismatch"),
            ViolationKind::InvalidDateFormat => write!(f, "invalid date format"),
        }
    }
}

/// A single mismatch between supplied values and the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    pub detail: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)?;
        if !self.detail.is_empty() {
            write!(f, " ({})", self.detail)?;
        }
        Ok(())
    }
}

/// Reason a single value does not conform to a kind
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Rejection {
    pub kind: ViolationKind,
    pub detail: String,
}

impl Rejection {
    fn new(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    fn mismatch(expected: &FieldKind, value: &FieldValue) -> Self {
        Self::new(
            ViolationKind::TypeMismatch,
            format!("expected {}, found {}", expected, value.shape()),
        )
    }
}

/// Check every declared field, in declaration order
pub fn validate(schema: &Schema, values: &FieldValues) -> Vec<Violation> {
    for name in values.names() {
        if schema.field(name).is_none() {
            debug!(field = name, "ignoring value for undeclared field");
        }
    }

    schema
        .fields()
        .iter()
        .filter_map(|spec| match values.get(&spec.name) {
            None if spec.required => Some(Violation::new(
                &spec.name,
                ViolationKind::MissingRequired,
                "no value supplied",
            )),
            None => None,
            Some(value) => check_value(&spec.kind, value, spec.required)
                .err()
                .map(|rejection| Violation::new(&spec.name, rejection.kind, rejection.detail)),
        })
        .collect()
}

/// Check one value against a kind
pub(crate) fn check_value(
    kind: &FieldKind,
    value: &FieldValue,
    required: bool,
) -> Result<(), Rejection> {
    match (kind, value) {
        (FieldKind::String, FieldValue::Text(s)) => {
            if required && s.is_empty() {
                Err(Rejection::new(
                    ViolationKind::MissingRequired,
                    "empty value for required field",
                ))
            } else {
                Ok(())
            }
        }
        (FieldKind::String, other) => Err(Rejection::mismatch(kind, other)),

        (FieldKind::Enum(_), FieldValue::List(_)) => Err(Rejection::mismatch(kind, value)),
        (FieldKind::Enum(allowed), scalar) => {
            let text = scalar.scalar_text().unwrap_or_default();
            if allowed.iter().any(|a| *a == text) {
                Ok(())
            } else {
                Err(Rejection::new(
                    ViolationKind::InvalidEnumValue,
                    format!("'{}' is not one of: {}", text, allowed.join(", ")),
                ))
            }
        }

        (FieldKind::Number, FieldValue::Integer(_)) => Ok(()),
        (FieldKind::Number, FieldValue::Number(n)) if n.is_finite() => Ok(()),
        (FieldKind::Number, FieldValue::Text(s)) if parse_number(s).is_some() => Ok(()),
        (FieldKind::Number, FieldValue::Text(s)) => Err(Rejection::new(
            ViolationKind::TypeMismatch,
            format!("'{}' is not a finite number", s),
        )),
        (FieldKind::Number, other) => Err(Rejection::mismatch(kind, other)),

        (FieldKind::Boolean, FieldValue::Bool(_)) => Ok(()),
        (FieldKind::Boolean, FieldValue::Text(s)) if parse_bool(s).is_some() => Ok(()),
        (FieldKind::Boolean, FieldValue::Text(s)) => Err(Rejection::new(
            ViolationKind::TypeMismatch,
            format!("'{}' is not 'true' or 'false'", s),
        )),
        (FieldKind::Boolean, other) => Err(Rejection::mismatch(kind, other)),

        (FieldKind::List, FieldValue::List(_)) => Ok(()),
        (FieldKind::List, other) => Err(Rejection::mismatch(kind, other)),

        (FieldKind::Date, FieldValue::Text(s)) => match parse_date(s) {
            Some(_) => Ok(()),
            None => Err(Rejection::new(
                ViolationKind::InvalidDateFormat,
                format!("'{}' is not a YYYY-MM-DD date", s),
            )),
        },
        (FieldKind::Date, other) => Err(Rejection::mismatch(kind, other)),
    }
}

/// Parse a finite numeric literal, ignoring surrounding whitespace
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse the boolean literals `true` and `false`
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse an ISO-8601 calendar date in its extended form, `YYYY-MM-DD`
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
