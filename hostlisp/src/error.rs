//! Error types for host interop analysis.

use hostlisp_reader::{ReadError, Span};
use thiserror::Error;

use crate::host::CatalogError;

/// An internal invariant was violated. Never caused by user source; it means
/// the host type system produced a category this crate does not model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal invariant violated: {0}")]
pub struct InvariantViolation(pub String);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteropError {
    /// Shape violation: wrong arity or wrong element kind.
    #[error("malformed member access at {span}: {message}")]
    MalformedForm { message: String, span: Span },

    #[error("no field, property or zero-arity method `{member}` on {type_name} at {span}")]
    MissingMember {
        type_name: String,
        member: String,
        span: Span,
    },

    #[error("by-ref argument `{symbol}` is not a local binding at {span}")]
    InvalidByRef { symbol: String, span: Span },

    #[error("invalid type argument `{arg}` at {span}")]
    InvalidTypeArg { arg: String, span: Span },

    #[error("unable to resolve type `{name}` at {span}")]
    UnresolvedType { name: String, span: Span },

    #[error("unsupported form at {span}: {form}")]
    UnsupportedForm { form: String, span: Span },

    #[error("cannot assign to {target} at {span}")]
    InvalidAssignTarget { target: String, span: Span },

    #[error(transparent)]
    Internal(#[from] InvariantViolation),
}

impl InteropError {
    pub fn malformed(message: impl Into<String>, span: Span) -> Self {
        InteropError::MalformedForm {
            message: message.into(),
            span,
        }
    }

    /// True for the fatal internal class, as opposed to user diagnostics.
    pub fn is_internal(&self) -> bool {
        matches!(self, InteropError::Internal(_))
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            InteropError::MalformedForm { span, .. }
            | InteropError::MissingMember { span, .. }
            | InteropError::InvalidByRef { span, .. }
            | InteropError::InvalidTypeArg { span, .. }
            | InteropError::UnresolvedType { span, .. }
            | InteropError::UnsupportedForm { span, .. }
            | InteropError::InvalidAssignTarget { span, .. } => Some(*span),
            InteropError::Internal(_) => None,
        }
    }
}

pub type InteropResult<T> = Result<T, InteropError>;

/// Any failure surfaced by the [`Session`](crate::api::Session) API.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    #[error("interop error: {0}")]
    Interop(#[from] InteropError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CompileError {
    /// Render the offending source line, when the error has a location.
    pub fn format_with_context(&self, source: &str) -> String {
        let span = match self {
            CompileError::Read(e) => Some(*e.span()),
            CompileError::Interop(e) => e.span(),
            CompileError::Catalog(_)
            | CompileError::Config(_)
            | CompileError::Serialization(_) => None,
        };
        match span {
            Some(span) => format!("{}\n{}", self, span.render_context(source)),
            None => self.to_string(),
        }
    }
}
