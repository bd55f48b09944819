//! Schema model: declared fields plus the parsed template body
//!
//! A [`Schema`] is immutable once built. Every structural problem with a
//! template definition (duplicate names, contradictory defaults, unknown
//! placeholders) surfaces here, before any values are looked at.

mod field;

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::error::SchemaError;
use crate::parser::{self, Body};
use crate::validator;

pub use field::{FieldKind, FieldSpec};

/// Minimum similarity for a declared name to be offered as a suggestion
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Ordered field declarations and the template body they fill
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    body: Body,
}

impl Schema {
    /// Build a schema, checking every construction invariant
    ///
    /// Fields are checked in declaration order, then the body. The first
    /// problem found is returned.
    pub fn new(fields: Vec<FieldSpec>, body: impl Into<String>) -> Result<Self, SchemaError> {
        let mut fields = fields;
        let mut seen: HashSet<String> = HashSet::new();

        for field in &mut fields {
            if !field::is_valid_name(&field.name) {
                return Err(SchemaError::InvalidFieldName {
                    name: field.name.clone(),
                });
            }
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            if let FieldKind::Enum(allowed) = &mut field.kind {
                dedup_in_order(allowed);
                if allowed.is_empty() {
                    return Err(SchemaError::EmptyEnum {
                        name: field.name.clone(),
                    });
                }
            }
            if field.required && field.default.is_some() {
                return Err(SchemaError::RequiredWithDefault {
                    name: field.name.clone(),
                });
            }
            if let Some(default) = &field.default {
                validator::check_value(&field.kind, default, false).map_err(|rejection| {
                    SchemaError::invalid_default(&field.name, &field.kind, rejection.detail)
                })?;
            }
        }

        let body: String = body.into();
        let body = parser::parse(&body).map_err(|errs| {
            errs.into_iter()
                .next()
                .unwrap_or_else(|| SchemaError::MalformedPlaceholder {
                    span: 0..body.len(),
                    message: "invalid template body".to_string(),
                    expected: vec![],
                })
        })?;

        for placeholder in body.placeholders() {
            if !seen.contains(&placeholder.node) {
                return Err(SchemaError::undeclared(
                    &placeholder.node,
                    placeholder.span.clone(),
                    suggest(&placeholder.node, &fields),
                ));
            }
        }

        debug!(
            fields = fields.len(),
            segments = body.segments.len(),
            "schema constructed"
        );

        Ok(Self { fields, body })
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The parsed template body
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// The template body as written
    pub fn template_body(&self) -> &str {
        &self.body.source
    }

    /// Referenced field names, in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.body
            .placeholders()
            .map(|p| p.node.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Declared fields the body never references
    pub fn unused_fields(&self) -> Vec<&FieldSpec> {
        let used: HashSet<&str> = self.body.placeholders().map(|p| p.node.as_str()).collect();
        self.fields
            .iter()
            .filter(|f| !used.contains(f.name.as_str()))
            .collect()
    }
}

fn dedup_in_order(values: &mut Vec<String>) {
    let mut seen = HashSet::new();
    values.retain(|v| seen.insert(v.clone()));
}

/// Declared names similar to `name`, best match first
fn suggest(name: &str, fields: &[FieldSpec]) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = fields
        .iter()
        .map(|f| (strsim::jaro_winkler(name, &f.name), f.name.as_str()))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(3)
        .map(|(_, n)| n.to_string())
        .collect()
}
