//! doc-stencil - schema-validated documentation templates
//!
//! This library checks a set of field values against a template's schema and,
//! when they conform, substitutes them into the template body.
//!
//! # Example
//!
//! ```rust
//! use doc_stencil::{render, FieldSpec, FieldValues, RenderResult, Schema};
//!
//! let schema = Schema::new(
//!     vec![FieldSpec::enumeration("status", ["draft", "review", "published"]).required()],
//!     "Status: {{status}}",
//! )
//! .unwrap();
//!
//! let values = FieldValues::new().with("status", "review");
//! assert_eq!(
//!     render(&schema, &values),
//!     RenderResult::Rendered { document: "Status: review".to_string() }
//! );
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod parser;
pub mod resolver;
pub mod schema;
pub mod validator;
pub mod values;

pub use config::{ConfigError, RenderConfig, UnresolvedMarker};
pub use error::SchemaError;
pub use loader::{LoadError, TemplateFile};
pub use resolver::{resolve, resolve_with_config};
pub use schema::{FieldKind, FieldSpec, Schema};
pub use validator::{validate, Violation, ViolationKind};
pub use values::{FieldValue, FieldValues, ValuesError};

use tracing::debug;

/// Outcome of a render: exactly one of a finished document or the reasons
/// the values were rejected
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    Rendered { document: String },
    Rejected { violations: Vec<Violation> },
}

impl RenderResult {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderResult::Rendered { .. })
    }

    /// The document, if rendering succeeded
    pub fn document(&self) -> Option<&str> {
        match self {
            RenderResult::Rendered { document } => Some(document),
            RenderResult::Rejected { .. } => None,
        }
    }

    /// The violations, if the values were rejected
    pub fn violations(&self) -> &[Violation] {
        match self {
            RenderResult::Rendered { .. } => &[],
            RenderResult::Rejected { violations } => violations,
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<String, Vec<Violation>> {
        match self {
            RenderResult::Rendered { document } => Ok(document),
            RenderResult::Rejected { violations } => Err(violations),
        }
    }
}

/// Render a schema's template with default configuration
///
/// This is the main entry point for the library. It validates `values`
/// and, only if there are no violations, resolves the template body.
///
/// # Example
///
/// ```rust
/// use doc_stencil::{render, FieldSpec, FieldValues, Schema, ViolationKind};
///
/// let schema = Schema::new(
///     vec![FieldSpec::number("id").required()],
///     "ADR-{{id}}",
/// )
/// .unwrap();
///
/// let result = render(&schema, &FieldValues::new().with("id", "abc"));
/// assert_eq!(result.violations()[0].kind, ViolationKind::TypeMismatch);
/// ```
pub fn render(schema: &Schema, values: &FieldValues) -> RenderResult {
    render_with_config(schema, values, &RenderConfig::default())
}

/// Render a schema's template with custom configuration
///
/// # Example
///
/// ```rust
/// use doc_stencil::{render_with_config, FieldSpec, FieldValues, RenderConfig, Schema, UnresolvedMarker};
///
/// let schema = Schema::new(vec![FieldSpec::string("owner")], "Owner: {{owner}}").unwrap();
/// let config = RenderConfig::new().with_marker(UnresolvedMarker::Custom("TBD".into()));
///
/// let result = render_with_config(&schema, &FieldValues::new(), &config);
/// assert_eq!(result.document(), Some("Owner: TBD"));
/// ```
pub fn render_with_config(
    schema: &Schema,
    values: &FieldValues,
    config: &RenderConfig,
) -> RenderResult {
    let violations = validate(schema, values);
    if !violations.is_empty() {
        debug!(violations = violations.len(), "values rejected");
        return RenderResult::Rejected { violations };
    }

    let document = resolve_with_config(schema, values, config);
    debug!(bytes = document.len(), "template rendered");
    RenderResult::Rendered { document }
}
