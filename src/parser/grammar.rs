//! Body grammar using chumsky
//!
//! ```text
//! body        := segment*
//! segment     := placeholder | text
//! placeholder := "{{" space* ident space* "}}"
//! text        := any token except "{{"
//! ```

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::SchemaError;
use crate::parser::ast::{Body, Segment, Spanned};
use crate::parser::lexer::Token;

/// Parse a template body into text and placeholder segments
///
/// Adjacent text tokens are merged, so the result alternates between text
/// runs and placeholders. A `{{` that does not open a well-formed
/// placeholder is an error.
pub fn parse(input: &str) -> Result<Body, Vec<SchemaError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let segments = body_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect::<Vec<_>>())?;

    Ok(Body {
        source: input.to_string(),
        segments: merge_text(segments),
    })
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn body_parser<'a, I>() -> impl Parser<'a, I, Vec<Segment>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let space = select! { Token::Space(_) => () }.repeated();

    let name = select! { Token::Ident(s) => s };

    let placeholder = just(Token::Open)
        .ignore_then(space.clone())
        .ignore_then(name)
        .then_ignore(space)
        .then_ignore(just(Token::Close))
        .map_with(|name, e| Segment::Placeholder(Spanned::new(name, span_range(&e.span()))));

    let text = select! {
        Token::Text(s) => s,
        Token::Ident(s) => s,
        Token::Space(s) => s,
        Token::Close => "}}".to_string(),
    }
    .map(Segment::Text);

    choice((placeholder, text))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

fn merge_text(segments: Vec<Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments {
        match (merged.last_mut(), seg) {
            (Some(Segment::Text(prev)), Segment::Text(next)) => prev.push_str(&next),
            (_, seg) => merged.push(seg),
        }
    }
    merged
}
