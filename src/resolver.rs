//! Placeholder resolution - substitutes values into a template body

use tracing::trace;

use crate::config::RenderConfig;
use crate::parser::Segment;
use crate::schema::{FieldKind, FieldSpec, Schema};
use crate::validator::{parse_bool, parse_date};
use crate::values::{format_number, FieldValue, FieldValues};

/// Resolve placeholders with the default configuration
pub fn resolve(schema: &Schema, values: &FieldValues) -> String {
    resolve_with_config(schema, values, &RenderConfig::default())
}

/// Resolve every placeholder in the schema's body
///
/// Intended to run after validation has passed; it never fails. For each
/// placeholder the supplied value wins, then the field's default, then the
/// configured unresolved marker. Substituted text is never scanned again.
pub fn resolve_with_config(schema: &Schema, values: &FieldValues, config: &RenderConfig) -> String {
    let body = schema.body();
    let mut out = String::with_capacity(body.source.len());

    for segment in &body.segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder(name) => {
                let name = name.node.as_str();
                // Construction guarantees every placeholder is declared
                let Some(spec) = schema.field(name) else {
                    out.push_str(&config.marker.render(name));
                    continue;
                };
                match values.get(name).or(spec.default.as_ref()) {
                    Some(value) => {
                        trace!(field = name, "substituting value");
                        out.push_str(&render_value(spec, value, config));
                    }
                    None => {
                        trace!(field = name, "no value or default, writing marker");
                        out.push_str(&config.marker.render(name));
                    }
                }
            }
        }
    }

    out
}

/// Textual form of a value for the field it fills
pub fn render_value(spec: &FieldSpec, value: &FieldValue, config: &RenderConfig) -> String {
    match (&spec.kind, value) {
        (_, FieldValue::List(items)) => items.join(&config.list_separator),
        (FieldKind::Number, FieldValue::Text(s)) => s.trim().to_string(),
        (FieldKind::Boolean, FieldValue::Text(s)) => match parse_bool(s) {
            Some(b) => b.to_string(),
            None => s.clone(),
        },
        (FieldKind::Date, FieldValue::Text(s)) => match parse_date(s) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => s.clone(),
        },
        (_, FieldValue::Text(s)) => s.clone(),
        (_, FieldValue::Integer(i)) => i.to_string(),
        (_, FieldValue::Number(n)) => format_number(*n),
        (_, FieldValue::Bool(b)) => b.to_string(),
    }
}
