//! Token definitions for the form lexer.
//!
//! Bare atoms (numbers, symbols, keywords, `nil`, `true`, `false`) share a
//! single token; the reader classifies the atom text afterwards.


use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"([ \t\r\n\f,]+|;[^\n]*)")]
pub enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    /// Opening quote; the lexer scans the string body itself.
    #[token("\"")]
    DoubleQuote,

    /// `|verbatim symbol text|`
    #[regex(r"\|[^|\n]*\|")]
    PipeSymbol,

    /// `\a`, `\newline`, `\space`, `\tab`; longer bodies are rejected by the reader
    #[regex(r#"\\([^ \t\r\n\f,()\[\]";]+|[^ \t\r\n\f])"#)]
    Char,

    #[regex(r#"[^ \t\r\n\f,()\[\]"';|\\]+"#)]
    Atom,
}

impl Token {
    /// Short human-readable description, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::DoubleQuote => "string",
            Token::PipeSymbol => "symbol",
            Token::Char => "character",
            Token::Atom => "atom",
        }
    }

    /// Whether this token closes a compound form.
    pub fn is_closing(&self) -> bool {
        matches!(self, Token::RParen | Token::RBracket)
    }
}
