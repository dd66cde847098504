//! Expression IR produced by analysis.
//!
//! Nodes are built once per form and are read-only afterwards. They are
//! serializable so that a whole analyzed form can be dumped as JSON.

mod host;

pub use host::{HostExpr, MethodCall, ParamDescriptor, ParamMode};

use serde::{Deserialize, Serialize};

use crate::context::{LocalBinding, Site};
use crate::types::{HostType, OverflowMode, PrimitiveKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    Keyword(String),
}

impl Literal {
    pub fn host_type(&self) -> Option<HostType> {
        match self {
            Literal::Nil | Literal::Keyword(_) => None,
            Literal::Bool(_) => Some(PrimitiveKind::Boolean.into()),
            Literal::Int(_) => Some(PrimitiveKind::Int64.into()),
            Literal::Float(_) => Some(PrimitiveKind::Double.into()),
            Literal::Char(_) => Some(PrimitiveKind::Char.into()),
            Literal::Str(_) => Some(HostType::string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Constant(Literal),
    Local(LocalBinding),
    /// Namespace variable, by qualified name
    Global(String),
    /// A host type used as a value
    TypeRef(HostType),
    Host(Box<HostExpr>),
    /// `(set! (. target member) value)`
    Assign {
        target: Box<HostExpr>,
        value: Box<Expr>,
        overflow: OverflowMode,
        site: Site,
    },
}

impl Expr {
    pub fn host(expr: HostExpr) -> Self {
        Expr::Host(Box::new(expr))
    }

    /// The statically known host type of this expression, if any.
    pub fn host_type(&self) -> Option<HostType> {
        match self {
            Expr::Constant(lit) => lit.host_type(),
            Expr::Local(binding) => binding.tag.clone(),
            Expr::Global(_) | Expr::TypeRef(_) => None,
            Expr::Host(host) => host.host_type(),
            Expr::Assign { target, .. } => target.host_type(),
        }
    }

    pub fn has_host_type(&self) -> bool {
        self.host_type().is_some()
    }

    pub fn as_host(&self) -> Option<&HostExpr> {
        match self {
            Expr::Host(host) => Some(host),
            _ => None,
        }
    }
}
