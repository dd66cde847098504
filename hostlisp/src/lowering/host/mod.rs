//! Member-access forms: `(. target member args...)`.
//!
//! The target decides static vs instance: if it resolves as a type the
//! access is static, otherwise it is analyzed as an ordinary expression.
//! The member position then decides between a zero-arity access and a
//! call:
//!
//! ```text
//! (. Math PI)                    zero-arity, static
//! (. obj -Count)                 zero-arity, field/property only
//! (. String (Format "{0}" x))    call, list style
//! (. String Format "{0}" x)      call, flat style
//! (. Array Empty (type-args int))
//! ```
//!
//! # Sub-modules
//!
//! - `type_resolver`: speculative and strict type-name resolution
//! - `type_args`: `(type-args ...)` clauses
//! - `args`: standard and `(by-ref local)` arguments
//! - `munge`: source names to host member names

mod args;
mod munge;
mod type_args;
mod type_resolver;

pub use args::{classify_args, BY_REF_MARKER};
pub use munge::munge;
pub use type_args::{parse_type_args, TYPE_ARGS_MARKER};
pub use type_resolver::{lookup_strict, resolve_type, tag_to_type};

use hostlisp_reader::{Form, Span, Symbol};
use tracing::{debug, warn};

use crate::context::{ParseContext, Site};
use crate::error::{InteropError, InteropResult};
use crate::host::MethodInfo;
use crate::ir::{Expr, HostExpr, MethodCall};
use crate::lowering::ExprAnalyzer;
use crate::types::HostType;

/// Head symbol of a member-access form.
pub const DOT: &str = ".";

enum Receiver {
    Static(HostType),
    Instance(Expr),
}

/// Classify a member-access form into exactly one [`HostExpr`] variant.
pub fn analyze_host_form<A: ExprAnalyzer + ?Sized>(
    analyzer: &A,
    ctx: &ParseContext<'_>,
    form: &Form<HostType>,
) -> InteropResult<HostExpr> {
    let Some(items) = form.as_list() else {
        return Err(InteropError::malformed("expected a list", form.span));
    };
    if items.len() < 3 {
        return Err(InteropError::malformed(
            "member access needs a target and a member",
            form.span,
        ));
    }

    let site = ctx.site(form.span);
    let target_form = &items[1];
    let receiver = match resolve_type(ctx, target_form, false)? {
        Some(ty) => Receiver::Static(ty),
        None => Receiver::Instance(analyzer.analyze(&ctx.with_assign_target(false), target_form)?),
    };

    let node = match items[2].as_symbol() {
        Some(member) if items.len() == 3 => analyze_zero_arity(ctx, receiver, member, site)?,
        _ => analyze_call(analyzer, ctx, receiver, &items[2..], form.span, site)?,
    };

    debug!(
        member = node.member_name(),
        kind = node.kind_name(),
        reflective = node.is_reflective(),
        "analyzed member access"
    );
    Ok(node)
}

/// Strip a property-style `-` prefix. A lone `-` is an ordinary name.
fn split_property_style(name: &str) -> (bool, &str) {
    match name.strip_prefix('-') {
        Some(rest) if !rest.is_empty() => (true, rest),
        _ => (false, name),
    }
}

fn analyze_zero_arity(
    ctx: &ParseContext<'_>,
    receiver: Receiver,
    member: &Symbol,
    site: Site,
) -> InteropResult<HostExpr> {
    let (property_style, raw) = split_property_style(&member.name);
    let name = munge(raw);
    let host = ctx.host;

    match receiver {
        Receiver::Static(ty) => {
            if let Some(field) = host.find_field(&ty, &name, true) {
                return Ok(HostExpr::StaticField { ty, field, site });
            }
            if let Some(property) = host.find_property(&ty, &name, true) {
                return Ok(HostExpr::StaticProperty { ty, property, site });
            }
            if !property_style {
                if let Some(method) = host.find_zero_arity_method(&ty, &name, true) {
                    let call = zero_arity_call(ctx, name, method);
                    return Ok(HostExpr::StaticMethod { ty, call, site });
                }
            }
            Err(InteropError::MissingMember {
                type_name: ty.name(),
                member: name,
                span: site.span,
            })
        }
        Receiver::Instance(target) => {
            if let Some(ty) = target.host_type() {
                if let Some(field) = host.find_field(&ty, &name, false) {
                    return Ok(HostExpr::InstanceField {
                        target,
                        name,
                        field: Some(field),
                        site,
                    });
                }
                if let Some(property) = host.find_property(&ty, &name, false) {
                    return Ok(HostExpr::InstanceProperty {
                        target,
                        property,
                        site,
                    });
                }
                if !property_style {
                    if let Some(method) = host.find_zero_arity_method(&ty, &name, false) {
                        let call = zero_arity_call(ctx, name, method);
                        return Ok(HostExpr::InstanceMethod { target, call, site });
                    }
                }
            }
            Ok(deferred_member(ctx, target, name, site))
        }
    }
}

fn zero_arity_call(ctx: &ParseContext<'_>, name: String, method: MethodInfo) -> MethodCall {
    MethodCall {
        name,
        type_args: None,
        params: Vec::new(),
        method: Some(method),
        overflow: ctx.overflow,
    }
}

/// An instance member that could not be resolved statically. As a `set!`
/// target it is a field whose handle is found at run time; anywhere else it
/// is a dynamic zero-arity call.
fn deferred_member(ctx: &ParseContext<'_>, target: Expr, name: String, site: Site) -> HostExpr {
    if ctx.warn_on_reflection {
        warn!(
            location = %site,
            member = %name,
            "reflection warning: reference to member cannot be resolved"
        );
    }
    if ctx.assign_target {
        HostExpr::InstanceField {
            target,
            name,
            field: None,
            site,
        }
    } else {
        HostExpr::InstanceDynamicZeroArityCall { target, name, site }
    }
}

fn analyze_call<A: ExprAnalyzer + ?Sized>(
    analyzer: &A,
    ctx: &ParseContext<'_>,
    receiver: Receiver,
    rest: &[Form<HostType>],
    form_span: Span,
    site: Site,
) -> InteropResult<HostExpr> {
    let (head, tail) = match rest[0].as_list() {
        Some(call) => {
            if rest.len() > 1 {
                return Err(InteropError::malformed(
                    "a list member must be the last element",
                    form_span,
                ));
            }
            match call.split_first() {
                Some((head, tail)) => (head, tail),
                None => {
                    return Err(InteropError::malformed("empty member call", rest[0].span))
                }
            }
        }
        None => (&rest[0], &rest[1..]),
    };

    let Some(method_sym) = head.as_symbol() else {
        return Err(InteropError::malformed(
            format!("method name must be a symbol, found {}", head),
            head.span,
        ));
    };
    let name = munge(&method_sym.name);

    let (type_args, arg_forms) = match tail.split_first() {
        Some((clause, after)) if clause.is_list_headed_by(TYPE_ARGS_MARKER) => {
            let clause_items = clause.as_list().unwrap_or(&[]);
            let types = parse_type_args(ctx, clause_items.get(1..).unwrap_or(&[]))?;
            (Some(types), after)
        }
        _ => (None, tail),
    };

    let params = classify_args(analyzer, ctx, arg_forms)?;

    let (lookup_type, is_static) = match &receiver {
        Receiver::Static(ty) => (Some(ty.clone()), true),
        Receiver::Instance(target) => (target.host_type(), false),
    };
    let method = lookup_type.and_then(|ty| {
        ctx.host
            .find_method(&ty, &name, params.len(), is_static)
            .filter(|m| match &type_args {
                Some(types) => m.generic_arity == types.len(),
                None => !m.is_generic(),
            })
    });

    if method.is_none() && ctx.warn_on_reflection {
        warn!(
            location = %site,
            method = %name,
            arity = params.len(),
            "reflection warning: call to method cannot be resolved"
        );
    }

    let call = MethodCall {
        name,
        type_args,
        params,
        method,
        overflow: ctx.overflow,
    };
    Ok(match receiver {
        Receiver::Static(ty) => HostExpr::StaticMethod { ty, call, site },
        Receiver::Instance(target) => HostExpr::InstanceMethod { target, call, site },
    })
}
