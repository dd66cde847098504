//! Forms to expression IR.
//!
//! [`ExprAnalyzer`] is the recursive entry point. Member-access forms are
//! handled by [`host::analyze_host_form`], which calls back into the
//! analyzer for instance targets and arguments. [`FormAnalyzer`] is the
//! default analyzer: symbols, literals, member access and `set!`.

pub mod host;

use hostlisp_reader::{Form, FormKind, Symbol};

use crate::context::{Mapping, ParseContext};
use crate::error::{InteropError, InteropResult};
use crate::ir::{Expr, Literal};
use crate::types::HostType;

pub use host::analyze_host_form;

/// Head symbol of an assignment form.
pub const SET: &str = "set!";

pub trait ExprAnalyzer {
    fn analyze(&self, ctx: &ParseContext<'_>, form: &Form<HostType>) -> InteropResult<Expr>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormAnalyzer;

impl ExprAnalyzer for FormAnalyzer {
    fn analyze(&self, ctx: &ParseContext<'_>, form: &Form<HostType>) -> InteropResult<Expr> {
        match &form.kind {
            FormKind::Nil => Ok(Expr::Constant(Literal::Nil)),
            FormKind::Bool(b) => Ok(Expr::Constant(Literal::Bool(*b))),
            FormKind::Int(n) => Ok(Expr::Constant(Literal::Int(*n))),
            FormKind::Float(x) => Ok(Expr::Constant(Literal::Float(*x))),
            FormKind::Char(c) => Ok(Expr::Constant(Literal::Char(*c))),
            FormKind::Str(s) => Ok(Expr::Constant(Literal::Str(s.clone()))),
            FormKind::Keyword(k) => Ok(Expr::Constant(Literal::Keyword(k.to_string()))),
            FormKind::Embedded(ty) => Ok(Expr::TypeRef(ty.clone())),
            FormKind::Symbol(sym) => analyze_symbol(ctx, sym, form),
            FormKind::List(_) if form.is_list_headed_by(host::DOT) => {
                analyze_host_form(self, ctx, form).map(Expr::host)
            }
            FormKind::List(_) if form.is_list_headed_by(SET) => analyze_assign(self, ctx, form),
            FormKind::List(_) | FormKind::Vector(_) => Err(InteropError::UnsupportedForm {
                form: form.to_string(),
                span: form.span,
            }),
        }
    }
}

fn analyze_symbol(
    ctx: &ParseContext<'_>,
    sym: &Symbol,
    form: &Form<HostType>,
) -> InteropResult<Expr> {
    if let Some(binding) = ctx.locals.reference_local(sym) {
        return Ok(Expr::Local(binding.clone()));
    }
    if sym.is_qualified() {
        return Ok(Expr::Global(sym.to_string()));
    }
    match ctx.namespace.lookup(&sym.name) {
        Some(Mapping::Var(qualified)) => Ok(Expr::Global(qualified.clone())),
        Some(Mapping::Type(ty)) => Ok(Expr::TypeRef(ty.clone())),
        None => match host::resolve_type(ctx, form, false)? {
            Some(ty) => Ok(Expr::TypeRef(ty)),
            None => Err(InteropError::UnsupportedForm {
                form: format!("unable to resolve symbol {}", sym),
                span: form.span,
            }),
        },
    }
}

/// `(set! (. target member) value)`
fn analyze_assign<A: ExprAnalyzer + ?Sized>(
    analyzer: &A,
    ctx: &ParseContext<'_>,
    form: &Form<HostType>,
) -> InteropResult<Expr> {
    let items = form.as_list().unwrap_or(&[]);
    let [_, target_form, value_form] = items else {
        return Err(InteropError::malformed(
            "set! takes a target and a value",
            form.span,
        ));
    };

    if !target_form.is_list_headed_by(host::DOT) {
        return Err(InteropError::InvalidAssignTarget {
            target: target_form.to_string(),
            span: target_form.span,
        });
    }

    let target = analyze_host_form(analyzer, &ctx.with_assign_target(true), target_form)?;
    if !target.is_assignable() {
        return Err(InteropError::InvalidAssignTarget {
            target: format!("{} {}", target.kind_name(), target.member_name()),
            span: target_form.span,
        });
    }

    let value = analyzer.analyze(&ctx.with_assign_target(false), value_form)?;
    Ok(Expr::Assign {
        target: Box::new(target),
        value: Box::new(value),
        overflow: ctx.overflow,
        site: ctx.site(form.span),
    })
}
