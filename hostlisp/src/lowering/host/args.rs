//! Call-argument classification.

use hostlisp_reader::Form;

use crate::context::ParseContext;
use crate::error::{InteropError, InteropResult};
use crate::ir::ParamDescriptor;
use crate::lowering::ExprAnalyzer;
use crate::types::HostType;

/// Head symbol marking a by-reference argument: `(by-ref local)`.
pub const BY_REF_MARKER: &str = "by-ref";

/// Turn argument forms into parameter descriptors, preserving order.
///
/// Standard arguments are analyzed as ordinary expressions outside any
/// assignment-target position.
pub fn classify_args<A: ExprAnalyzer + ?Sized>(
    analyzer: &A,
    ctx: &ParseContext<'_>,
    forms: &[Form<HostType>],
) -> InteropResult<Vec<ParamDescriptor>> {
    let arg_ctx = ctx.with_assign_target(false);
    forms
        .iter()
        .map(|form| {
            if form.is_list_headed_by(BY_REF_MARKER) {
                classify_by_ref(ctx, form)
            } else {
                analyzer
                    .analyze(&arg_ctx, form)
                    .map(ParamDescriptor::Standard)
            }
        })
        .collect()
}

fn classify_by_ref(
    ctx: &ParseContext<'_>,
    form: &Form<HostType>,
) -> InteropResult<ParamDescriptor> {
    let items = form.as_list().unwrap_or(&[]);
    let invalid = |symbol: String| InteropError::InvalidByRef {
        symbol,
        span: form.span,
    };

    let [_, operand] = items else {
        return Err(invalid(form.to_string()));
    };
    let Some(sym) = operand.as_symbol() else {
        return Err(invalid(operand.to_string()));
    };
    match ctx.locals.reference_local(sym) {
        Some(binding) => Ok(ParamDescriptor::by_ref(binding.clone())),
        None => Err(invalid(sym.to_string())),
    }
}
