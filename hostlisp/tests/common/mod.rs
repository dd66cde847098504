//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use hostlisp::{
    CompileError, CompilerOptions, Expr, HostCatalog, HostExpr, HostType, LexicalEnv, Session,
};

/// Test-only types layered on top of the built-in catalog.
pub const FIXTURE_CATALOG: &str = r#"
[[types]]
name = "Fixture.Counter"

[[types.fields]]
name = "count"
type = "System.Int32"

[[types.methods]]
name = "count"
returns = "System.Int32"

[[types.methods]]
name = "Increment"
params = ["System.Int32"]
returns = "System.Int32"

[[types]]
name = "Fixture.Blob"

[[types.methods]]
name = "size"
returns = "System.Int32"

[[types]]
name = "Fixture.Util"

[[types.fields]]
name = "Level"
type = "System.Int32"
static = true

[[types.methods]]
name = "Level"
returns = "System.Int32"
static = true

[[types.methods]]
name = "Reset"
static = true

[[types.methods]]
name = "Scale"
params = ["System.Double", "System.Int64"]
returns = "System.Double"
static = true

[[types.methods]]
name = "Convert"
params = ["System.Object"]
returns = "System.Object"
static = true
generic_arity = 2

[[types]]
name = "Fixture.Point"
kind = "struct"

[[types.fields]]
name = "X"
type = "System.Int32"

[[types.properties]]
name = "Length"
type = "System.Double"

[[types]]
name = "Fixture.Both"

[[types.fields]]
name = "Shared"
type = "System.Int32"
static = true

[[types.properties]]
name = "Shared"
type = "System.Int64"
static = true

[[types.properties]]
name = "Mode"
type = "System.String"
static = true

[[types.methods]]
name = "Mode"
returns = "System.Int32"
static = true

[[types.fields]]
name = "tag"
type = "System.Int32"

[[types.properties]]
name = "tag"
type = "System.String"

[[types.properties]]
name = "Size"
type = "System.Int64"

[[types.methods]]
name = "Size"
returns = "System.Int32"
"#;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn fixture_catalog() -> HostCatalog {
    let mut catalog = HostCatalog::builtin().expect("builtin catalog");
    catalog
        .extend_from_toml_str(FIXTURE_CATALOG)
        .expect("fixture catalog");
    catalog
}

pub fn session_with(options: CompilerOptions) -> Session {
    init_tracing();
    let mut session = Session::with_catalog(options, fixture_catalog());
    let counter = HostType::Class("Fixture.Counter".into());
    let blob = HostType::Class("Fixture.Blob".into());
    let util = HostType::Class("Fixture.Util".into());
    let point = HostType::Struct("Fixture.Point".into());
    let both = HostType::Class("Fixture.Both".into());
    let ns = session.namespace_mut();
    ns.import("Counter", counter);
    ns.import("Blob", blob);
    ns.import("Util", util);
    ns.import("Point", point);
    ns.import("Both", both);
    ns.intern_var("config");
    session
}

pub fn session() -> Session {
    session_with(CompilerOptions::default())
}

/// Locals used across tests: `counter`, `blob`, `point`, `obj` (untyped),
/// `n` (Int32) and `both`.
pub fn locals() -> LexicalEnv {
    let mut env = LexicalEnv::new();
    env.bind("counter", Some(HostType::Class("Fixture.Counter".into())));
    env.bind("blob", Some(HostType::Class("Fixture.Blob".into())));
    env.bind("point", Some(HostType::Struct("Fixture.Point".into())));
    env.bind("obj", None);
    env.bind("n", Some(HostType::Primitive(hostlisp::PrimitiveKind::Int32)));
    env.bind("both", Some(HostType::Class("Fixture.Both".into())));
    env
}

pub fn analyze(src: &str) -> Result<Expr, CompileError> {
    session().analyze_str_with_locals(src, &locals())
}

pub fn analyze_host(src: &str) -> HostExpr {
    match analyze(src) {
        Ok(Expr::Host(node)) => *node,
        Ok(other) => panic!("expected a host expression, got {:?}", other),
        Err(e) => panic!("analysis of {} failed: {}", src, e),
    }
}
