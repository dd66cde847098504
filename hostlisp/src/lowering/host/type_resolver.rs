//! Deciding whether a form names a host type.
//!
//! [`resolve_type`] is speculative: most symbols are not types, and a
//! negative answer is `Ok(None)`. Only syntax that commits to "this must be
//! a type" (a dotted or array-suffixed name, a string literal where allowed)
//! turns a failed lookup into [`InteropError::UnresolvedType`].

use hostlisp_reader::{Form, FormKind, Span, Symbol};
use tracing::trace;

use crate::context::{Mapping, ParseContext};
use crate::error::{InteropError, InteropResult};
use crate::types::{primitive_tag, HostType, ARRAY_SUFFIX};

pub fn resolve_type(
    ctx: &ParseContext<'_>,
    form: &Form<HostType>,
    allow_string_literal: bool,
) -> InteropResult<Option<HostType>> {
    match &form.kind {
        // Already resolved: identity, no lookup.
        FormKind::Embedded(ty) => Ok(Some(ty.clone())),
        FormKind::Symbol(sym) => resolve_symbol(ctx, sym, form.span),
        FormKind::Str(name) if allow_string_literal => lookup_strict(ctx, name, form.span).map(Some),
        _ => Ok(None),
    }
}

fn resolve_symbol(
    ctx: &ParseContext<'_>,
    sym: &Symbol,
    span: Span,
) -> InteropResult<Option<HostType>> {
    if ctx.locals.is_bound(sym) {
        trace!(name = %sym, "shadowed by local, not a type");
        return Ok(None);
    }
    if sym.is_qualified() {
        return Ok(None);
    }

    let name = sym.name.as_str();
    if is_dotted(name) || name.ends_with(ARRAY_SUFFIX) {
        return lookup_strict(ctx, name, span).map(Some);
    }

    let resolved = match ctx.namespace.lookup(name) {
        Some(Mapping::Type(ty)) => Some(ty.clone()),
        Some(Mapping::Var(_)) => None,
        None => ctx.host.find_type(name),
    };
    trace!(name, resolved = ?resolved, "resolve_type");
    Ok(resolved)
}

/// A namespace separator after the first character.
fn is_dotted(name: &str) -> bool {
    name.find('.').is_some_and(|i| i > 0)
}

/// Look up a name that must denote a type.
///
/// The element of an array name may also be a namespace alias or a
/// primitive tag, so `Int32[]` and `int[]` both resolve.
pub fn lookup_strict(ctx: &ParseContext<'_>, name: &str, span: Span) -> InteropResult<HostType> {
    if let Some(ty) = ctx.host.find_type(name) {
        return Ok(ty);
    }

    if let Some(element) = name.strip_suffix(ARRAY_SUFFIX) {
        let element_type = if let Some(ty) = primitive_tag(element) {
            Some(ty.clone())
        } else if is_dotted(element) || element.ends_with(ARRAY_SUFFIX) {
            Some(lookup_strict(ctx, element, span)?)
        } else {
            match ctx.namespace.lookup(element) {
                Some(Mapping::Type(ty)) => Some(ty.clone()),
                _ => None,
            }
        };
        if let Some(ty) = element_type {
            return Ok(HostType::array_of(ty));
        }
    }

    Err(InteropError::UnresolvedType {
        name: name.to_string(),
        span,
    })
}

/// Resolve a type tag. Never yields "not a type": failure is an error.
pub fn tag_to_type(ctx: &ParseContext<'_>, tag: &Form<HostType>) -> InteropResult<HostType> {
    if let Some(sym) = tag.as_symbol() {
        if !sym.is_qualified() {
            if let Some(ty) = primitive_tag(&sym.name) {
                return Ok(ty.clone());
            }
        }
    }

    resolve_type(ctx, tag, true)?.ok_or_else(|| InteropError::UnresolvedType {
        name: tag.to_string(),
        span: tag.span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{LexicalEnv, Namespace, SourceInfo};
    use crate::host::HostCatalog;
    use crate::types::PrimitiveKind;

    struct Fixture {
        catalog: HostCatalog,
        ns: Namespace,
        env: LexicalEnv,
        source: SourceInfo,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = HostCatalog::builtin().unwrap();
            let mut ns = Namespace::with_default_imports("user", &catalog);
            ns.intern_var("helper");
            let mut env = LexicalEnv::new();
            env.bind("String", None);
            Self {
                catalog,
                ns,
                env,
                source: SourceInfo::new("test"),
            }
        }

        fn ctx(&self) -> ParseContext<'_> {
            ParseContext::new(&self.catalog, &self.ns, &self.env, &self.source)
        }
    }

    fn sym(name: &str) -> Form<HostType> {
        Form::synthetic(FormKind::Symbol(Symbol::parse(name)))
    }

    #[test]
    fn test_embedded_type_is_identity() {
        let fx = Fixture::new();
        let ty = HostType::Class("Not.In.Catalog".into());
        let form = Form::synthetic(FormKind::Embedded(ty.clone()));
        assert_eq!(resolve_type(&fx.ctx(), &form, false).unwrap(), Some(ty));
    }

    #[test]
    fn test_local_shadows_type() {
        let fx = Fixture::new();
        assert_eq!(resolve_type(&fx.ctx(), &sym("String"), false).unwrap(), None);
    }

    #[test]
    fn test_qualified_symbol_is_not_a_type() {
        let fx = Fixture::new();
        assert_eq!(
            resolve_type(&fx.ctx(), &sym("System/Math"), false).unwrap(),
            None
        );
    }

    #[test]
    fn test_dotted_name_is_strict() {
        let fx = Fixture::new();
        assert_eq!(
            resolve_type(&fx.ctx(), &sym("System.Math"), false).unwrap(),
            Some(HostType::Class("System.Math".into()))
        );
        let err = resolve_type(&fx.ctx(), &sym("System.Nope"), false).unwrap_err();
        assert!(matches!(err, InteropError::UnresolvedType { name, .. } if name == "System.Nope"));
    }

    #[test]
    fn test_leading_dot_is_not_strict() {
        let fx = Fixture::new();
        assert_eq!(resolve_type(&fx.ctx(), &sym(".Math"), false).unwrap(), None);
        assert_eq!(resolve_type(&fx.ctx(), &sym("."), false).unwrap(), None);
        assert!(is_dotted("System.Math"));
        assert!(!is_dotted(".toString"));
    }

    #[test]
    fn test_array_suffix_is_strict() {
        let fx = Fixture::new();
        assert_eq!(
            resolve_type(&fx.ctx(), &sym("Int32[]"), false).unwrap(),
            Some(HostType::array_of(PrimitiveKind::Int32.into()))
        );
        assert_eq!(
            resolve_type(&fx.ctx(), &sym("int[][]"), false).unwrap(),
            Some(HostType::array_of(HostType::array_of(
                PrimitiveKind::Int32.into()
            )))
        );
        assert!(resolve_type(&fx.ctx(), &sym("Nope[]"), false).is_err());
    }

    #[test]
    fn test_alias_and_speculative_lookup() {
        let fx = Fixture::new();
        assert_eq!(
            resolve_type(&fx.ctx(), &sym("Math"), false).unwrap(),
            Some(HostType::Class("System.Math".into()))
        );
        // Var mapping is not a type.
        assert_eq!(resolve_type(&fx.ctx(), &sym("helper"), false).unwrap(), None);
        // Ordinary identifiers quietly fail.
        assert_eq!(resolve_type(&fx.ctx(), &sym("frobnicate"), false).unwrap(), None);
    }

    #[test]
    fn test_string_literal_only_when_allowed() {
        let fx = Fixture::new();
        let lit = Form::synthetic(FormKind::Str("System.Math".into()));
        assert_eq!(resolve_type(&fx.ctx(), &lit, false).unwrap(), None);
        assert_eq!(
            resolve_type(&fx.ctx(), &lit, true).unwrap(),
            Some(HostType::Class("System.Math".into()))
        );
        let bad = Form::synthetic(FormKind::Str("Nope".into()));
        assert!(resolve_type(&fx.ctx(), &bad, true).is_err());
    }

    #[test]
    fn test_tag_to_type() {
        let fx = Fixture::new();
        assert_eq!(
            tag_to_type(&fx.ctx(), &sym("long")).unwrap(),
            PrimitiveKind::Int64.into()
        );
        assert_eq!(
            tag_to_type(&fx.ctx(), &sym("doubles")).unwrap(),
            HostType::array_of(PrimitiveKind::Double.into())
        );
        assert_eq!(
            tag_to_type(&fx.ctx(), &sym("Math")).unwrap(),
            HostType::Class("System.Math".into())
        );
        let err = tag_to_type(&fx.ctx(), &sym("frobnicate")).unwrap_err();
        assert!(matches!(err, InteropError::UnresolvedType { .. }));
    }
}
