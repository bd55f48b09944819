//! Parsed representation of a template body

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One piece of a template body
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text copied to the output unchanged
    Text(String),
    /// A `{{name}}` token; the span covers the whole token including braces
    Placeholder(Spanned<String>),
}

/// A parsed template body: the original text plus its segments in order
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub source: String,
    pub segments: Vec<Segment>,
}

impl Body {
    /// Iterate over placeholder tokens in body order
    pub fn placeholders(&self) -> impl Iterator<Item = &Spanned<String>> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Placeholder(name) => Some(name),
            Segment::Text(_) => None,
        })
    }
}
