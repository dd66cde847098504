//! Lexer for hostlisp source
//!
//! Wraps the logos-generated lexer with one-token lookahead, line/column
//! spans and manual scanning of string bodies.

use logos::Logos;

use crate::error::{ReadError, ReadResult};
use crate::span::{SourceMap, Span};
use crate::token::Token;

/// A token with its span
#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    source_map: SourceMap,
    /// Peeked token (for lookahead)
    peeked: Option<ReadResult<SpannedToken<'a>>>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.inner.span().end)
            .field("peeked", &self.peeked)
            .finish()
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            source_map: SourceMap::new(source),
            peeked: None,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Span covering the end of input, used for EOF diagnostics.
    pub fn eof_span(&self) -> Span {
        self.source_map.span(self.source.len(), self.source.len())
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Option<&ReadResult<SpannedToken<'a>>> {
        if self.peeked.is_none() {
            self.peeked = self.next_token_internal();
        }
        self.peeked.as_ref()
    }

    pub fn next_token(&mut self) -> Option<ReadResult<SpannedToken<'a>>> {
        if let Some(peeked) = self.peeked.take() {
            return Some(peeked);
        }
        self.next_token_internal()
    }

    fn next_token_internal(&mut self) -> Option<ReadResult<SpannedToken<'a>>> {
        let result = self.inner.next()?;
        let span = self.inner.span();

        match result {
            Ok(Token::DoubleQuote) => match self.scan_string_to_close(span.end) {
                Ok(string_end) => {
                    // Extend the current token over the string body and closing quote
                    self.inner.bump(string_end - span.end);
                    let text = &self.source[span.start..string_end];
                    Some(Ok(SpannedToken::new(
                        Token::DoubleQuote,
                        self.source_map.span(span.start, string_end),
                        text,
                    )))
                }
                Err(e) => {
                    self.inner.bump(self.source.len() - span.end);
                    Some(Err(e))
                }
            },
            Ok(token) => Some(Ok(SpannedToken::new(
                token,
                self.source_map.span(span.start, span.end),
                &self.source[span.start..span.end],
            ))),
            Err(()) => Some(Err(ReadError::LexerError {
                span: self.source_map.span(span.start, span.end),
            })),
        }
    }

    /// Scan string content to find the closing quote.
    /// Returns the byte offset just past the closing quote.
    fn scan_string_to_close(&self, start: usize) -> ReadResult<usize> {
        let bytes = self.source.as_bytes();
        let mut pos = start;

        while pos < bytes.len() {
            match memchr::memchr2(b'\\', b'"', &bytes[pos..]) {
                None => break,
                Some(offset) => {
                    pos += offset;
                    if bytes[pos] == b'\\' {
                        pos += 2;
                        continue;
                    }
                    return Ok(pos + 1);
                }
            }
        }

        Err(ReadError::UnterminatedString {
            span: self
                .source_map
                .span(start - 1, pos.min(self.source.len())),
        })
    }

    pub fn is_eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Collect all tokens (for debugging)
    pub fn collect_all(mut self) -> Vec<ReadResult<SpannedToken<'a>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ReadResult<SpannedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize source code into a vector of spanned tokens
pub fn tokenize(source: &str) -> Vec<ReadResult<SpannedToken<'_>>> {
    Lexer::new(source).collect_all()
}
