//! Ambient analysis state.
//!
//! The enclosing compiler establishes a [`ParseContext`] around each
//! top-level form. Analysis only reads it; nested positions that need a
//! different view (assignment target, extra locals) derive a new value.

use std::collections::HashMap;
use std::fmt;

use hostlisp_reader::{Span, Symbol};
use serde::{Deserialize, Serialize};

use crate::host::{HostCatalog, HostEnvironment};
use crate::types::{HostType, OverflowMode};

/// What a namespace maps a bare name to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    /// An imported host type
    Type(HostType),
    /// A namespace variable, by fully qualified name
    Var(String),
}

/// Alias table of the current namespace.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    name: String,
    mappings: HashMap<String, Mapping>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mappings: HashMap::new(),
        }
    }

    /// Import the short name of every `System.X` type in the catalog.
    pub fn with_default_imports(name: impl Into<String>, catalog: &HostCatalog) -> Self {
        use crate::host::TypeLookup;

        let mut ns = Self::new(name);
        for full in catalog.type_names() {
            let Some(short) = full.strip_prefix("System.") else {
                continue;
            };
            if short.contains('.') {
                continue;
            }
            if let Some(ty) = catalog.find_type(full) {
                ns.import(short, ty);
            }
        }
        ns
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn import(&mut self, alias: impl Into<String>, ty: HostType) {
        self.mappings.insert(alias.into(), Mapping::Type(ty));
    }

    pub fn intern_var(&mut self, name: impl Into<String>) {
        let name = name.into();
        let qualified = format!("{}/{}", self.name, name);
        self.mappings.insert(name, Mapping::Var(qualified));
    }

    pub fn lookup(&self, name: &str) -> Option<&Mapping> {
        self.mappings.get(name)
    }
}

/// A lexical local visible at the current position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalBinding {
    pub name: String,
    /// Slot index, unique within one environment
    pub index: usize,
    /// Declared host type, if any
    pub tag: Option<HostType>,
}

#[derive(Debug, Clone, Default)]
pub struct LexicalEnv {
    bindings: Vec<LocalBinding>,
}

impl LexicalEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new local, shadowing any earlier binding with the same name.
    pub fn bind(&mut self, name: impl Into<String>, tag: Option<HostType>) -> &LocalBinding {
        let index = self.bindings.len();
        self.bindings.push(LocalBinding {
            name: name.into(),
            index,
            tag,
        });
        &self.bindings[index]
    }

    /// The innermost binding for `sym`. Qualified symbols never name locals.
    pub fn reference_local(&self, sym: &Symbol) -> Option<&LocalBinding> {
        if sym.is_qualified() {
            return None;
        }
        self.bindings.iter().rev().find(|b| b.name == sym.name)
    }

    pub fn is_bound(&self, sym: &Symbol) -> bool {
        self.reference_local(sym).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceInfo {
    pub name: String,
}

impl SourceInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Source location threaded into every node for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub source: String,
    pub span: Span,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.span)
    }
}

/// Read-only state for analyzing one top-level form.
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub host: &'a dyn HostEnvironment,
    pub namespace: &'a Namespace,
    pub locals: &'a LexicalEnv,
    pub overflow: OverflowMode,
    pub source: &'a SourceInfo,
    /// The form being analyzed is the target of `set!`
    pub assign_target: bool,
    pub warn_on_reflection: bool,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        host: &'a dyn HostEnvironment,
        namespace: &'a Namespace,
        locals: &'a LexicalEnv,
        source: &'a SourceInfo,
    ) -> Self {
        Self {
            host,
            namespace,
            locals,
            overflow: OverflowMode::Checked,
            source,
            assign_target: false,
            warn_on_reflection: false,
        }
    }

    pub fn with_overflow(self, overflow: OverflowMode) -> Self {
        Self { overflow, ..self }
    }

    pub fn with_warn_on_reflection(self, warn_on_reflection: bool) -> Self {
        Self {
            warn_on_reflection,
            ..self
        }
    }

    pub fn with_assign_target(self, assign_target: bool) -> Self {
        Self {
            assign_target,
            ..self
        }
    }

    pub fn with_locals(self, locals: &'a LexicalEnv) -> Self {
        Self { locals, ..self }
    }

    pub fn site(&self, span: Span) -> Site {
        Site {
            source: self.source.name.clone(),
            span,
        }
    }
}

impl fmt::Debug for ParseContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("namespace", &self.namespace.name())
            .field("locals", &self.locals.len())
            .field("overflow", &self.overflow)
            .field("source", &self.source.name)
            .field("assign_target", &self.assign_target)
            .field("warn_on_reflection", &self.warn_on_reflection)
            .finish_non_exhaustive()
    }
}
