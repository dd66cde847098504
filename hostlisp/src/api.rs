//! Rust API for analyzing hostlisp source.
//!
//! A [`Session`] owns the host catalog and the namespace that ambient
//! contexts are built from.
//!
//! ```
//! use hostlisp::api::Session;
//! use hostlisp::config::CompilerOptions;
//!
//! let session = Session::new(CompilerOptions::default()).unwrap();
//! let expr = session.analyze_str("(. Math PI)").unwrap();
//! assert_eq!(expr.host_type().map(|t| t.name()), Some("System.Double".to_string()));
//! ```

use hostlisp_reader::{read_one, Form};
use tracing::debug;

use crate::config::CompilerOptions;
use crate::context::{LexicalEnv, Namespace, ParseContext, SourceInfo};
use crate::emit::{emit_expr, Instr};
use crate::error::CompileError;
use crate::host::HostCatalog;
use crate::ir::Expr;
use crate::lowering::{ExprAnalyzer, FormAnalyzer};
use crate::types::HostType;

const DEFAULT_NAMESPACE: &str = "user";

#[derive(Debug)]
pub struct Session {
    options: CompilerOptions,
    catalog: HostCatalog,
    namespace: Namespace,
    source: SourceInfo,
}

impl Session {
    /// Create a session over the built-in catalog plus `options.catalog_path`.
    pub fn new(options: CompilerOptions) -> Result<Self, CompileError> {
        let mut catalog = HostCatalog::builtin()?;
        if let Some(path) = &options.catalog_path {
            debug!(path = %path.display(), "loading host catalog");
            catalog.extend_from_path(path)?;
        }
        Ok(Self::with_catalog(options, catalog))
    }

    pub fn with_catalog(options: CompilerOptions, catalog: HostCatalog) -> Self {
        let namespace = Namespace::with_default_imports(DEFAULT_NAMESPACE, &catalog);
        let source = SourceInfo::new(options.source_name.clone());
        Self {
            options,
            catalog,
            namespace,
            source,
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn catalog(&self) -> &HostCatalog {
        &self.catalog
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn namespace_mut(&mut self) -> &mut Namespace {
        &mut self.namespace
    }

    /// The ambient context for one top-level form.
    pub fn context<'a>(&'a self, locals: &'a LexicalEnv) -> ParseContext<'a> {
        ParseContext::new(&self.catalog, &self.namespace, locals, &self.source)
            .with_overflow(self.options.overflow_mode())
            .with_warn_on_reflection(self.options.warn_on_reflection)
    }

    pub fn analyze_str(&self, src: &str) -> Result<Expr, CompileError> {
        self.analyze_str_with_locals(src, &LexicalEnv::new())
    }

    pub fn analyze_str_with_locals(
        &self,
        src: &str,
        locals: &LexicalEnv,
    ) -> Result<Expr, CompileError> {
        let form: Form<HostType> = read_one(src)?;
        let expr = FormAnalyzer.analyze(&self.context(locals), &form)?;
        Ok(expr)
    }

    pub fn emit_str(&self, src: &str, locals: &LexicalEnv) -> Result<Vec<Instr>, CompileError> {
        let expr = self.analyze_str_with_locals(src, locals)?;
        Ok(emit_expr(&expr)?)
    }

    /// Analyze and dump the expression tree as JSON.
    pub fn analyze_to_json(&self, src: &str) -> Result<String, CompileError> {
        let expr = self.analyze_str(src)?;
        Ok(serde_json::to_string_pretty(&expr)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InteropError;

    #[test]
    fn test_read_errors_surface() {
        let session = Session::new(CompilerOptions::default()).unwrap();
        let err = session.analyze_str("(. Math PI").unwrap_err();
        assert!(matches!(err, CompileError::Read(_)));
    }

    #[test]
    fn test_interop_errors_surface() {
        let session = Session::new(CompilerOptions::default()).unwrap();
        let err = session.analyze_str("(. Math Tau)").unwrap_err();
        assert!(matches!(
            err,
            CompileError::Interop(InteropError::MissingMember { .. })
        ));
    }

    #[test]
    fn test_overflow_mode_follows_options() {
        let options = CompilerOptions {
            unchecked_math: true,
            ..CompilerOptions::default()
        };
        let session = Session::new(options).unwrap();
        let expr = session.analyze_str("(. Math Max 1 2)").unwrap();
        let call = expr.as_host().and_then(|h| h.method_call()).unwrap();
        assert_eq!(call.overflow, crate::types::OverflowMode::Unchecked);
    }

    #[test]
    fn test_json_dump() {
        let session = Session::new(CompilerOptions::default()).unwrap();
        let json = session.analyze_to_json("(. Math PI)").unwrap();
        assert!(json.contains("StaticField"));
        assert!(json.contains("\"PI\""));
    }

    #[test]
    fn test_missing_catalog_file() {
        let options = CompilerOptions {
            catalog_path: Some("/definitely/not/here.toml".into()),
            ..CompilerOptions::default()
        };
        let err = Session::new(options).unwrap_err();
        assert!(matches!(err, CompileError::Catalog(_)));
    }
}
