//! Error types for schema construction

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Reasons a schema cannot be constructed
///
/// These are fatal: no [`Schema`](crate::Schema) is produced and the template
/// definition has to be fixed before anything can be rendered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Two fields share a name
    #[error("duplicate field '{name}'")]
    DuplicateField { name: String },

    /// Field name is not an identifier
    #[error("invalid field name '{name}': expected letters, digits, '_' or '-', starting with a letter or '_'")]
    InvalidFieldName { name: String },

    /// Enum field without allowed values
    #[error("enum field '{name}' declares no allowed values")]
    EmptyEnum { name: String },

    /// Required field that also declares a default
    #[error("required field '{name}' cannot declare a default")]
    RequiredWithDefault { name: String },

    /// Default value that does not conform to the field kind
    #[error("default for field '{name}' is not a valid {kind}: {reason}")]
    InvalidDefault {
        name: String,
        kind: String,
        reason: String,
    },

    /// Placeholder naming a field the schema does not declare
    #[error("template references undeclared field '{name}'")]
    UndeclaredPlaceholder {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    /// A `{{` that does not open a `{{name}}` token
    #[error("malformed placeholder at {span:?}: {message}")]
    MalformedPlaceholder {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl SchemaError {
    /// Create an undeclared placeholder error with suggestions
    pub fn undeclared(name: impl Into<String>, span: Span, suggestions: Vec<String>) -> Self {
        Self::UndeclaredPlaceholder {
            name: name.into(),
            span,
            suggestions,
        }
    }

    /// Create an invalid default error
    pub fn invalid_default(
        name: impl Into<String>,
        kind: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDefault {
            name: name.into(),
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    /// Field this error is about, for field-level errors
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::DuplicateField { name }
            | Self::InvalidFieldName { name }
            | Self::EmptyEnum { name }
            | Self::RequiredWithDefault { name }
            | Self::InvalidDefault { name, .. } => Some(name),
            Self::UndeclaredPlaceholder { .. } | Self::MalformedPlaceholder { .. } => None,
        }
    }

    /// Get the source span (relative to the template body) if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UndeclaredPlaceholder { span, .. } => Some(span),
            Self::MalformedPlaceholder { span, .. } => Some(span),
            _ => None,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UndeclaredPlaceholder { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }

    /// Move the span by `offset` bytes, for bodies embedded in a larger file
    pub fn shifted(mut self, offset: usize) -> Self {
        match &mut self {
            Self::UndeclaredPlaceholder { span, .. } | Self::MalformedPlaceholder { span, .. } => {
                *span = span.start + offset..span.end + offset;
            }
            _ => {}
        }
        self
    }

    /// Format the error with source context using ariadne
    ///
    /// `span` overrides the error's own span; errors with no span at all are
    /// reported at the start of the source.
    pub fn format(&self, source: &str, filename: &str, span: Option<Span>) -> String {
        let span = span.or_else(|| self.span().cloned()).unwrap_or(0..0);
        let mut note = String::new();
        match self {
            Self::UndeclaredPlaceholder { suggestions, .. } if !suggestions.is_empty() => {
                note = format!("did you mean {}?", quote_list(suggestions));
            }
            Self::MalformedPlaceholder { expected, .. } if !expected.is_empty() => {
                note = format!("expected: {}", expected.join(", "));
            }
            _ => {}
        }
        report(source, filename, span, &self.to_string(), &note)
    }
}

/// Render a single-label ariadne report into a string
pub(crate) fn report(source: &str, filename: &str, span: Span, message: &str, note: &str) -> String {
    let span = char_span(source, span);
    let mut buf = Vec::new();
    let mut builder = Report::build(ReportKind::Error, filename, span.start)
        .with_config(Config::default().with_color(false))
        .with_message(message)
        .with_label(
            Label::new((filename, span))
                .with_message(message)
                .with_color(Color::Red),
        );
    if !note.is_empty() {
        builder = builder.with_note(note);
    }

    match builder
        .finish()
        .write((filename, Source::from(source)), &mut buf)
    {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => message.to_string(),
    }
}

/// Convert a byte range to the char range ariadne indexes by
fn char_span(source: &str, span: Span) -> Span {
    let to_char = |byte: usize| {
        source
            .char_indices()
            .take_while(|(i, _)| *i < byte.min(source.len()))
            .count()
    };
    to_char(span.start)..to_char(span.end)
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(" or ")
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for SchemaError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("unexpected {} inside placeholder", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        SchemaError::MalformedPlaceholder {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Open => "'{{'".to_string(),
        Token::Close => "'}}'".to_string(),
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::Space(_) => "whitespace".to_string(),
        Token::Text(s) => format!("text '{}'", s.escape_debug()),
    }
}
