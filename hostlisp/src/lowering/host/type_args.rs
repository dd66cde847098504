//! `(type-args T1 T2 ...)` clauses.

use hostlisp_reader::Form;

use super::type_resolver::tag_to_type;
use crate::context::ParseContext;
use crate::error::{InteropError, InteropResult};
use crate::types::HostType;

/// Head symbol of a generic type-argument clause.
pub const TYPE_ARGS_MARKER: &str = "type-args";

/// Resolve every element of a clause tail, in order. Any failure fails the
/// whole clause.
pub fn parse_type_args(
    ctx: &ParseContext<'_>,
    forms: &[Form<HostType>],
) -> InteropResult<Vec<HostType>> {
    forms
        .iter()
        .map(|form| {
            let invalid = || InteropError::InvalidTypeArg {
                arg: form.to_string(),
                span: form.span,
            };
            if form.as_symbol().is_none() {
                return Err(invalid());
            }
            match tag_to_type(ctx, form) {
                Ok(ty) => Ok(ty),
                Err(err) if err.is_internal() => Err(err),
                Err(_) => Err(invalid()),
            }
        })
        .collect()
}
