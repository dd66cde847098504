// Prevent accidental debug output in library code.
#![deny(clippy::print_stderr)]

//! hostlisp
//!
//! Host-interop analysis for a dynamically typed Lisp that compiles to a
//! managed platform. Member-access forms such as `(. Math PI)` or
//! `(. sb (Append "x"))` become typed [`HostExpr`](ir::HostExpr) nodes,
//! with static vs instance dispatch and member kind decided at analysis
//! time, and numeric coercions planned per overflow mode.
//!
//! Pipeline: source → [`hostlisp_reader`] forms → [`lowering`] →
//! [`ir::Expr`] → [`emit`] instructions or [`Expr::eval`](ir::Expr::eval).

// Core modules
pub mod coercion;
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod ir;
pub mod types;

// Forms -> IR
pub mod lowering;

// IR consumers
pub mod emit;
pub mod eval;

// Rust API for programmatic use
pub mod api;

pub use api::Session;
pub use config::CompilerOptions;
pub use context::{LexicalEnv, LocalBinding, Namespace, ParseContext, SourceInfo};
pub use error::{CompileError, InteropError, InteropResult, InvariantViolation};
pub use host::{HostCatalog, HostEnvironment, MemberResolver, TypeLookup};
pub use ir::{Expr, HostExpr, Literal, MethodCall, ParamDescriptor, ParamMode};
pub use lowering::{ExprAnalyzer, FormAnalyzer};
pub use types::{HostType, OverflowMode, PrimitiveKind};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
