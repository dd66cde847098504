//! Read error types

use crate::span::Span;
use thiserror::Error;

/// Reader error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadError {
    /// Input ended inside an unfinished form
    #[error("unexpected end of input at {span}, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    /// A token that cannot start or continue a form at this position
    #[error("unexpected '{found}' at {span}")]
    UnexpectedToken { found: String, span: Span },

    /// Unterminated string
    #[error("unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },

    /// Invalid escape sequence inside a string
    #[error("invalid escape sequence '{sequence}' at {span}")]
    InvalidEscape { sequence: String, span: Span },

    /// Invalid number literal
    #[error("invalid number literal '{literal}' at {span}")]
    InvalidNumber { literal: String, span: Span },

    /// Invalid character literal
    #[error("invalid character literal '{literal}' at {span}")]
    InvalidCharacter { literal: String, span: Span },

    /// Lexer error
    #[error("unrecognized token at {span}")]
    LexerError { span: Span },
}

impl ReadError {
    pub fn span(&self) -> &Span {
        match self {
            ReadError::UnexpectedEof { span, .. }
            | ReadError::UnexpectedToken { span, .. }
            | ReadError::UnterminatedString { span }
            | ReadError::InvalidEscape { span, .. }
            | ReadError::InvalidNumber { span, .. }
            | ReadError::InvalidCharacter { span, .. }
            | ReadError::LexerError { span } => span,
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        ReadError::UnexpectedEof {
            expected: expected.into(),
            span,
        }
    }

    pub fn unexpected_token(found: impl Into<String>, span: Span) -> Self {
        ReadError::UnexpectedToken {
            found: found.into(),
            span,
        }
    }

    /// Format error with source context
    ///
    /// Returns the offending source line with a caret marker under the span.
    pub fn format_with_context(&self, source: &str) -> String {
        self.span().render_context(source)
    }
}

/// Result type for reading operations
pub type ReadResult<T> = Result<T, ReadError>;
