//! Template files: TOML front matter followed by the template body
//!
//! ```text
//! +++
//! title = "Architecture Decision Record"
//!
//! [[field]]
//! name = "status"
//! kind = "enum"
//! required = true
//! allowed = ["draft", "review", "published"]
//! +++
//! # ADR: {{title}}
//!
//! Status: {{status}}
//! ```
//!
//! A file that does not start with a `+++` line has no fields; all of it is
//! body.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::error::{report, SchemaError, Span};
use crate::schema::{FieldKind, FieldSpec, Schema};
use crate::values::{FieldValue, ValuesError};

/// Line that opens and closes the front matter block
const FENCE: &str = "+++";

/// Errors that can occur when loading a template file
///
/// Spans are byte ranges into the whole file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read template file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("front matter opened with '+++' is never closed")]
    UnterminatedFrontMatter { span: Span },

    #[error("invalid front matter: {message}")]
    FrontMatter { message: String, span: Option<Span> },

    #[error("unknown kind '{kind}' (expected string, enum, number, boolean, list or date)")]
    UnknownKind { kind: String, span: Span },

    #[error("field '{name}' lists allowed values but is not an enum")]
    AllowedWithoutEnum { name: String, span: Span },

    #[error("invalid default: {0}")]
    Default(#[from] ValuesError),

    #[error("{error}")]
    Schema {
        #[source]
        error: SchemaError,
        span: Option<Span>,
    },
}

impl LoadError {
    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UnterminatedFrontMatter { span }
            | Self::UnknownKind { span, .. }
            | Self::AllowedWithoutEnum { span, .. } => Some(span),
            Self::FrontMatter { span, .. } | Self::Schema { span, .. } => span.as_ref(),
            Self::IoError(_) | Self::Default(_) => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            Self::Schema { error, span } => error.format(source, filename, span.clone()),
            other => {
                let span = other.span().cloned().unwrap_or(0..0);
                report(source, filename, span, &other.to_string(), "")
            }
        }
    }
}

/// TOML structure for deserializing front matter
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    title: Option<String>,
    description: Option<String>,
    #[serde(default, rename = "field")]
    fields: Vec<TomlField>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlField {
    name: toml::Spanned<String>,
    kind: toml::Spanned<String>,
    #[serde(default)]
    required: bool,
    allowed: Option<Vec<String>>,
    default: Option<toml::Value>,
    description: Option<String>,
}

/// A loaded template: metadata plus its schema
#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub title: Option<String>,
    pub description: Option<String>,
    schema: Schema,
    body_offset: usize,
}

impl TemplateFile {
    /// Load a template from a file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a template from its source text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Self, LoadError> {
        let Some((front, body_offset)) = split_front_matter(source)? else {
            let schema = Schema::new(vec![], source).map_err(|error| schema_error(error, 0, &[]))?;
            return Ok(Self {
                title: None,
                description: None,
                schema,
                body_offset: 0,
            });
        };

        let front_offset = front.start;
        let parsed: FrontMatter =
            toml::from_str(&source[front]).map_err(|e| LoadError::FrontMatter {
                message: e.message().to_string(),
                span: e.span().map(|s| s.start + front_offset..s.end + front_offset),
            })?;

        let mut fields = Vec::with_capacity(parsed.fields.len());
        let mut name_spans = Vec::with_capacity(parsed.fields.len());
        for field in parsed.fields {
            let name_span = shift(field.name.span(), front_offset);
            let kind_span = shift(field.kind.span(), front_offset);
            let name = field.name.into_inner();
            let keyword = field.kind.into_inner();

            let kind = match (keyword.as_str(), field.allowed) {
                ("enum", allowed) => FieldKind::Enum(allowed.unwrap_or_default()),
                (_, Some(_)) => {
                    return Err(LoadError::AllowedWithoutEnum {
                        name,
                        span: name_span,
                    })
                }
                (other, None) => FieldKind::from_keyword(other).ok_or(LoadError::UnknownKind {
                    kind: keyword.clone(),
                    span: kind_span,
                })?,
            };

            let mut spec = FieldSpec::new(name.clone(), kind);
            spec.required = field.required;
            spec.description = field.description;
            if let Some(default) = field.default {
                spec.default = Some(FieldValue::from_toml(&name, default)?);
            }

            name_spans.push((name, name_span));
            fields.push(spec);
        }

        debug!(fields = fields.len(), body_offset, "parsed front matter");

        let schema = Schema::new(fields, &source[body_offset..])
            .map_err(|error| schema_error(error, body_offset, &name_spans))?;

        Ok(Self {
            title: parsed.title,
            description: parsed.description,
            schema,
            body_offset,
        })
    }

    /// The template's schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Byte offset of the body within the file
    pub fn body_offset(&self) -> usize {
        self.body_offset
    }
}

fn shift(span: Span, offset: usize) -> Span {
    span.start + offset..span.end + offset
}

/// Attach a file-relative span to a schema error
fn schema_error(error: SchemaError, body_offset: usize, name_spans: &[(String, Span)]) -> LoadError {
    let span = match (&error, error.field_name()) {
        // Point at the second declaration
        (SchemaError::DuplicateField { .. }, Some(name)) => name_spans
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone()),
        (_, Some(name)) => name_spans
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone()),
        (_, None) => error.span().map(|s| shift(s.clone(), body_offset)),
    };
    let error = if error.field_name().is_none() {
        error.shifted(body_offset)
    } else {
        error
    };
    LoadError::Schema { error, span }
}

/// Locate the front matter block
///
/// Returns the byte range of the TOML between the fences and the offset
/// where the body starts, or `None` if the source has no front matter.
fn split_front_matter(source: &str) -> Result<Option<(Span, usize)>, LoadError> {
    let mut lines = source.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(line) if line.trim_end() == FENCE => line.len(),
        _ => return Ok(None),
    };
    let front_start = offset;

    for line in lines {
        if line.trim_end() == FENCE {
            return Ok(Some((front_start..offset, offset + line.len())));
        }
        offset += line.len();
    }

    Err(LoadError::UnterminatedFrontMatter {
        span: 0..FENCE.len(),
    })
}
