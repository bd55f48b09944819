//! Lexer for template bodies using logos
//!
//! Every byte of the input lands in exactly one token, so concatenating the
//! token texts reproduces the body.

use logos::{Lexer, Logos};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

fn slice(lex: &mut Lexer<Token>) -> String {
    lex.slice().to_string()
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Placeholder delimiters (longer than a single brace, so they win)
    #[token("{{")]
    Open,
    #[token("}}")]
    Close,

    #[regex(r"[ \t]+", slice)]
    Space(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*", slice)]
    Ident(String),

    // Everything else, including lone braces
    #[regex(r"[^{}a-zA-Z_ \t]+", slice)]
    #[regex(r"[{}]", slice)]
    Text(String),
}

impl Token {
    /// The source text this token was lexed from
    pub fn text(&self) -> &str {
        match self {
            Token::Open => "{{",
            Token::Close => "}}",
            Token::Space(s) | Token::Ident(s) | Token::Text(s) => s,
        }
    }
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input).spanned().map(move |(tok, span)| {
        let tok = tok.unwrap_or_else(|_| Token::Text(input[span.clone()].to_string()));
        (tok, span)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_placeholder_tokens() {
        assert_eq!(
            tokens("{{status}}"),
            vec![
                Token::Open,
                Token::Ident("status".to_string()),
                Token::Close
            ]
        );
    }

    #[test]
    fn test_text_and_identifiers() {
        assert_eq!(
            tokens("Status: ok"),
            vec![
                Token::Ident("Status".to_string()),
                Token::Text(":".to_string()),
                Token::Space(" ".to_string()),
                Token::Ident("ok".to_string()),
            ]
        );
    }

    #[test]
    fn test_lone_braces_are_text() {
        assert_eq!(
            tokens("{a}"),
            vec![
                Token::Text("{".to_string()),
                Token::Ident("a".to_string()),
                Token::Text("}".to_string()),
            ]
        );
    }

    #[test]
    fn test_triple_braces() {
        assert_eq!(
            tokens("}}}"),
            vec![Token::Close, Token::Text("}".to_string())]
        );
    }

    #[test]
    fn test_identifier_with_dash_and_digits() {
        assert_eq!(
            tokens("api-v2_name"),
            vec![Token::Ident("api-v2_name".to_string())]
        );
    }

    #[test]
    fn test_lossless() {
        let input = "# {{title}}\n\n- owner: {{ owner }} {x} 42% ünïcode\n";
        let rebuilt: String = lex(input).map(|(t, _)| t.text().to_string()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_spans() {
        let spans: Vec<_> = lex("ab {{c}}").map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..2, 2..3, 3..5, 5..6, 6..8]);
    }
}
