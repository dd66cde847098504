//! hostlisp_reader
//!
//! Reader for hostlisp source text. Produces [`Form`] values annotated with
//! [`Span`]s for the compiler in the `hostlisp` crate.
//!
//! # Example
//!
//! ```
//! use hostlisp_reader::{read_one, Form, FormKind, Symbol};
//!
//! let form: Form = read_one("(. Math PI)").expect("read failed");
//! let items = form.as_list().expect("list");
//! assert_eq!(items[0].kind, FormKind::Symbol(Symbol::simple(".")));
//! ```

pub mod error;
pub mod form;
pub mod lexer;
pub mod reader;
pub mod span;
pub mod token;

// Re-exports
pub use error::{ReadError, ReadResult};
pub use form::{Form, FormKind, NoEmbed, Symbol};
pub use lexer::{Lexer, SpannedToken};
pub use reader::Reader;
pub use span::{SourceMap, Span};
pub use token::Token;

/// Read all top-level forms from source text.
pub fn read_all<E>(source: &str) -> ReadResult<Vec<Form<E>>> {
    Reader::new(source).read_all()
}

/// Read exactly one form; trailing forms are an error.
pub fn read_one<E>(source: &str) -> ReadResult<Form<E>> {
    let mut reader = Reader::new(source);
    let Some(form) = reader.read_next()? else {
        return Err(ReadError::unexpected_eof(
            "a form",
            SourceMap::new(source).span(source.len(), source.len()),
        ));
    };
    if let Some(extra) = reader.read_next::<E>()? {
        return Err(ReadError::unexpected_token(
            format!("trailing form after {}", form_label(&form)),
            extra.span,
        ));
    }
    Ok(form)
}

fn form_label<E>(form: &Form<E>) -> &'static str {
    match form.kind {
        FormKind::List(_) => "list",
        FormKind::Vector(_) => "vector",
        FormKind::Symbol(_) => "symbol",
        _ => "literal",
    }
}

/// Tokenize source text (for debugging)
pub fn tokenize(source: &str) -> Vec<ReadResult<SpannedToken<'_>>> {
    lexer::tokenize(source)
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
