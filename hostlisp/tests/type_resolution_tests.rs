//! Type resolution through the public lowering API.

mod common;

use std::cell::Cell;

use hostlisp::host::{FieldInfo, MethodInfo, PropertyInfo};
use hostlisp::lowering::host::{lookup_strict, resolve_type, tag_to_type};
use hostlisp::lowering::analyze_host_form;
use hostlisp::types::{primitive_tag, PRIMITIVE_TAGS};
use hostlisp::{
    FormAnalyzer, HostCatalog, HostType, InteropError, LexicalEnv, MemberResolver, Namespace,
    ParseContext, PrimitiveKind, SourceInfo, TypeLookup,
};
use hostlisp_reader::{Form, FormKind, Span, Symbol};
use pretty_assertions::assert_eq;

/// Delegates to a catalog and counts type lookups.
struct SpyHost {
    inner: HostCatalog,
    lookups: Cell<usize>,
}

impl SpyHost {
    fn new() -> Self {
        Self {
            inner: common::fixture_catalog(),
            lookups: Cell::new(0),
        }
    }
}

impl TypeLookup for SpyHost {
    fn find_type(&self, name: &str) -> Option<HostType> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.find_type(name)
    }
}

impl MemberResolver for SpyHost {
    fn find_field(&self, ty: &HostType, name: &str, is_static: bool) -> Option<FieldInfo> {
        self.inner.find_field(ty, name, is_static)
    }

    fn find_property(&self, ty: &HostType, name: &str, is_static: bool) -> Option<PropertyInfo> {
        self.inner.find_property(ty, name, is_static)
    }

    fn find_zero_arity_method(
        &self,
        ty: &HostType,
        name: &str,
        is_static: bool,
    ) -> Option<MethodInfo> {
        self.inner.find_zero_arity_method(ty, name, is_static)
    }

    fn find_method(
        &self,
        ty: &HostType,
        name: &str,
        arity: usize,
        is_static: bool,
    ) -> Option<MethodInfo> {
        self.inner.find_method(ty, name, arity, is_static)
    }
}

struct Env {
    host: SpyHost,
    ns: Namespace,
    locals: LexicalEnv,
    source: SourceInfo,
}

impl Env {
    fn new() -> Self {
        let host = SpyHost::new();
        let mut ns = Namespace::with_default_imports("user", &host.inner);
        ns.import("Counter", HostType::Class("Fixture.Counter".into()));
        Self {
            host,
            ns,
            locals: common::locals(),
            source: SourceInfo::new("types.hl"),
        }
    }

    fn ctx(&self) -> ParseContext<'_> {
        ParseContext::new(&self.host, &self.ns, &self.locals, &self.source)
    }
}

fn sym(name: &str) -> Form<HostType> {
    Form::synthetic(FormKind::Symbol(Symbol::parse(name)))
}

#[test]
fn test_embedded_type_skips_lookup() {
    let env = Env::new();
    let ty = HostType::Class("Never.Declared".into());
    let form = Form::synthetic(FormKind::Embedded(ty.clone()));

    assert_eq!(resolve_type(&env.ctx(), &form, false).unwrap(), Some(ty));
    assert_eq!(env.host.lookups.get(), 0);
}

#[test]
fn test_embedded_type_as_member_target() {
    let env = Env::new();
    let form = Form::list(
        vec![
            sym("."),
            Form::synthetic(FormKind::Embedded(HostType::Class("System.Math".into()))),
            sym("PI"),
        ],
        Span::synthetic(),
    );

    let node = analyze_host_form(&FormAnalyzer, &env.ctx(), &form).unwrap();
    assert_eq!(node.kind_name(), "StaticField");
    assert_eq!(env.host.lookups.get(), 0);
}

#[test]
fn test_alias_skips_lookup() {
    let env = Env::new();
    assert_eq!(
        resolve_type(&env.ctx(), &sym("Counter"), false).unwrap(),
        Some(HostType::Class("Fixture.Counter".into()))
    );
    assert_eq!(env.host.lookups.get(), 0);
}

#[test]
fn test_plain_symbol_falls_back_to_host() {
    let env = Env::new();
    assert_eq!(resolve_type(&env.ctx(), &sym("frobnicate"), false).unwrap(), None);
    assert_eq!(env.host.lookups.get(), 1);
}

#[test]
fn test_local_binding_is_never_a_type() {
    let env = Env::new();
    // `counter` is bound as a local of type Fixture.Counter.
    assert_eq!(resolve_type(&env.ctx(), &sym("counter"), false).unwrap(), None);
    assert_eq!(env.host.lookups.get(), 0);
}

#[test]
fn test_non_symbol_forms_are_not_types() {
    let env = Env::new();
    let ctx = env.ctx();
    let int = Form::synthetic(FormKind::Int(3));
    let list = Form::list(vec![sym("Math")], Span::synthetic());
    assert_eq!(resolve_type(&ctx, &int, false).unwrap(), None);
    assert_eq!(resolve_type(&ctx, &list, false).unwrap(), None);
}

#[test]
fn test_every_tag_resolves() {
    let env = Env::new();
    for tag in PRIMITIVE_TAGS {
        let expected = primitive_tag(tag).cloned().unwrap();
        assert_eq!(tag_to_type(&env.ctx(), &sym(tag)).unwrap(), expected, "{}", tag);
    }
    assert_eq!(env.host.lookups.get(), 0);
}

#[test]
fn test_tag_meanings() {
    let env = Env::new();
    let ctx = env.ctx();
    assert_eq!(
        tag_to_type(&ctx, &sym("float")).unwrap(),
        PrimitiveKind::Single.into()
    );
    assert_eq!(
        tag_to_type(&ctx, &sym("boolean")).unwrap(),
        tag_to_type(&ctx, &sym("bool")).unwrap()
    );
    assert_eq!(
        tag_to_type(&ctx, &sym("objects")).unwrap(),
        HostType::array_of(HostType::object())
    );
    assert_eq!(
        tag_to_type(&ctx, &sym("ulongs")).unwrap(),
        HostType::array_of(PrimitiveKind::UInt64.into())
    );
}

#[test]
fn test_tags_are_case_sensitive() {
    let env = Env::new();
    let err = tag_to_type(&env.ctx(), &sym("Int")).unwrap_err();
    assert!(matches!(err, InteropError::UnresolvedType { .. }));
}

#[test]
fn test_tag_falls_back_to_type_names() {
    let env = Env::new();
    let ctx = env.ctx();
    assert_eq!(
        tag_to_type(&ctx, &sym("Counter")).unwrap(),
        HostType::Class("Fixture.Counter".into())
    );
    assert_eq!(
        tag_to_type(&ctx, &sym("System.Text.StringBuilder")).unwrap(),
        HostType::Class("System.Text.StringBuilder".into())
    );
}

#[test]
fn test_strict_lookup_of_arrays() {
    let env = Env::new();
    let ctx = env.ctx();
    let span = Span::synthetic();
    assert_eq!(
        lookup_strict(&ctx, "Counter[]", span).unwrap(),
        HostType::array_of(HostType::Class("Fixture.Counter".into()))
    );
    assert_eq!(
        lookup_strict(&ctx, "double[]", span).unwrap(),
        HostType::array_of(PrimitiveKind::Double.into())
    );
    let err = lookup_strict(&ctx, "Missing.Type", span).unwrap_err();
    assert!(matches!(err, InteropError::UnresolvedType { name, .. } if name == "Missing.Type"));
}
