//! Host member-access nodes.

use serde::{Deserialize, Serialize};

use super::Expr;
use crate::context::{LocalBinding, Site};
use crate::host::{FieldInfo, MethodInfo, PropertyInfo};
use crate::types::{HostType, OverflowMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamMode {
    Standard,
    ByRef,
}

/// One call argument. A by-ref argument always names its bound local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamDescriptor {
    Standard(Expr),
    ByRef { local: LocalBinding, expr: Expr },
}

impl ParamDescriptor {
    pub fn by_ref(local: LocalBinding) -> Self {
        ParamDescriptor::ByRef {
            expr: Expr::Local(local.clone()),
            local,
        }
    }

    pub fn mode(&self) -> ParamMode {
        match self {
            ParamDescriptor::Standard(_) => ParamMode::Standard,
            ParamDescriptor::ByRef { .. } => ParamMode::ByRef,
        }
    }

    pub fn expr(&self) -> &Expr {
        match self {
            ParamDescriptor::Standard(expr) | ParamDescriptor::ByRef { expr, .. } => expr,
        }
    }

    pub fn bound_local(&self) -> Option<&LocalBinding> {
        match self {
            ParamDescriptor::Standard(_) => None,
            ParamDescriptor::ByRef { local, .. } => Some(local),
        }
    }
}

/// Payload shared by static and instance method nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub name: String,
    /// `None` when no `type-args` clause was written
    pub type_args: Option<Vec<HostType>>,
    pub params: Vec<ParamDescriptor>,
    /// Overload chosen at analysis time; `None` defers to run time
    pub method: Option<MethodInfo>,
    /// Overflow mode in effect where the call was written
    pub overflow: OverflowMode,
}

impl MethodCall {
    pub fn type_args(&self) -> &[HostType] {
        self.type_args.as_deref().unwrap_or(&[])
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_bound(&self) -> bool {
        self.method.is_some()
    }

    /// Return type of the bound method; `None` when unbound or `void`.
    pub fn return_type(&self) -> Option<HostType> {
        self.method
            .as_ref()
            .map(|m| m.return_type.clone())
            .filter(|ty| !ty.is_void())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostExpr {
    StaticField {
        ty: HostType,
        field: FieldInfo,
        site: Site,
    },
    StaticProperty {
        ty: HostType,
        property: PropertyInfo,
        site: Site,
    },
    StaticMethod {
        ty: HostType,
        call: MethodCall,
        site: Site,
    },
    /// `field` is `None` when the member could not be resolved and the
    /// access is an assignment target; resolution happens at run time.
    InstanceField {
        target: Expr,
        name: String,
        field: Option<FieldInfo>,
        site: Site,
    },
    InstanceProperty {
        target: Expr,
        property: PropertyInfo,
        site: Site,
    },
    InstanceMethod {
        target: Expr,
        call: MethodCall,
        site: Site,
    },
    /// Zero-arity member resolved by name at run time.
    InstanceDynamicZeroArityCall {
        target: Expr,
        name: String,
        site: Site,
    },
}

impl HostExpr {
    pub fn site(&self) -> &Site {
        match self {
            HostExpr::StaticField { site, .. }
            | HostExpr::StaticProperty { site, .. }
            | HostExpr::StaticMethod { site, .. }
            | HostExpr::InstanceField { site, .. }
            | HostExpr::InstanceProperty { site, .. }
            | HostExpr::InstanceMethod { site, .. }
            | HostExpr::InstanceDynamicZeroArityCall { site, .. } => site,
        }
    }

    /// Variant name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            HostExpr::StaticField { .. } => "StaticField",
            HostExpr::StaticProperty { .. } => "StaticProperty",
            HostExpr::StaticMethod { .. } => "StaticMethod",
            HostExpr::InstanceField { .. } => "InstanceField",
            HostExpr::InstanceProperty { .. } => "InstanceProperty",
            HostExpr::InstanceMethod { .. } => "InstanceMethod",
            HostExpr::InstanceDynamicZeroArityCall { .. } => "InstanceDynamicZeroArityCall",
        }
    }

    pub fn member_name(&self) -> &str {
        match self {
            HostExpr::StaticField { field, .. } => &field.name,
            HostExpr::StaticProperty { property, .. }
            | HostExpr::InstanceProperty { property, .. } => &property.name,
            HostExpr::StaticMethod { call, .. } | HostExpr::InstanceMethod { call, .. } => {
                &call.name
            }
            HostExpr::InstanceField { name, .. }
            | HostExpr::InstanceDynamicZeroArityCall { name, .. } => name,
        }
    }

    pub fn is_static(&self) -> bool {
        self.static_type().is_some()
    }

    /// The host type of a static access.
    pub fn static_type(&self) -> Option<&HostType> {
        match self {
            HostExpr::StaticField { ty, .. }
            | HostExpr::StaticProperty { ty, .. }
            | HostExpr::StaticMethod { ty, .. } => Some(ty),
            _ => None,
        }
    }

    /// The instance sub-expression of an instance access.
    pub fn target(&self) -> Option<&Expr> {
        match self {
            HostExpr::InstanceField { target, .. }
            | HostExpr::InstanceProperty { target, .. }
            | HostExpr::InstanceMethod { target, .. }
            | HostExpr::InstanceDynamicZeroArityCall { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn method_call(&self) -> Option<&MethodCall> {
        match self {
            HostExpr::StaticMethod { call, .. } | HostExpr::InstanceMethod { call, .. } => {
                Some(call)
            }
            _ => None,
        }
    }

    pub fn host_type(&self) -> Option<HostType> {
        match self {
            HostExpr::StaticField { field, .. } => Some(field.field_type.clone()),
            HostExpr::InstanceField { field, .. } => field.as_ref().map(|f| f.field_type.clone()),
            HostExpr::StaticProperty { property, .. }
            | HostExpr::InstanceProperty { property, .. } => Some(property.property_type.clone()),
            HostExpr::StaticMethod { call, .. } | HostExpr::InstanceMethod { call, .. } => {
                call.return_type()
            }
            HostExpr::InstanceDynamicZeroArityCall { .. } => None,
        }
    }

    /// True when the member is resolved by name at run time.
    pub fn is_reflective(&self) -> bool {
        match self {
            HostExpr::InstanceField { field, .. } => field.is_none(),
            HostExpr::InstanceDynamicZeroArityCall { .. } => true,
            HostExpr::StaticMethod { call, .. } | HostExpr::InstanceMethod { call, .. } => {
                !call.is_bound()
            }
            _ => false,
        }
    }

    /// Whether `set!` may target this node.
    pub fn is_assignable(&self) -> bool {
        match self {
            HostExpr::StaticField { .. } | HostExpr::InstanceField { .. } => true,
            HostExpr::StaticProperty { property, .. }
            | HostExpr::InstanceProperty { property, .. } => property.writable,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Literal;
    use hostlisp_reader::Span;

    fn site() -> Site {
        Site {
            source: "test".into(),
            span: Span::synthetic(),
        }
    }

    #[test]
    fn test_by_ref_descriptor_carries_local() {
        let local = LocalBinding {
            name: "n".into(),
            index: 0,
            tag: None,
        };
        let param = ParamDescriptor::by_ref(local.clone());
        assert_eq!(param.mode(), ParamMode::ByRef);
        assert_eq!(param.bound_local(), Some(&local));

        let standard = ParamDescriptor::Standard(Expr::Constant(Literal::Int(1)));
        assert_eq!(standard.mode(), ParamMode::Standard);
        assert!(standard.bound_local().is_none());
    }

    #[test]
    fn test_void_method_has_no_type() {
        let call = MethodCall {
            name: "WriteLine".into(),
            type_args: None,
            params: vec![],
            method: Some(MethodInfo {
                declaring_type: HostType::Class("System.Console".into()),
                name: "WriteLine".into(),
                params: vec![],
                return_type: HostType::Void,
                is_static: true,
                generic_arity: 0,
            }),
            overflow: OverflowMode::Checked,
        };
        assert!(call.type_args().is_empty());
        let node = HostExpr::StaticMethod {
            ty: HostType::Class("System.Console".into()),
            call,
            site: site(),
        };
        assert_eq!(node.host_type(), None);
        assert!(!node.is_reflective());
        assert!(node.is_static());
    }

    #[test]
    fn test_deferred_instance_field_is_reflective() {
        let node = HostExpr::InstanceField {
            target: Expr::Constant(Literal::Nil),
            name: "x".into(),
            field: None,
            site: site(),
        };
        assert!(node.is_reflective());
        assert!(node.is_assignable());
        assert_eq!(node.host_type(), None);
        assert!(node.target().is_some());
        assert!(node.static_type().is_none());
    }

    #[test]
    fn test_read_only_property_is_not_assignable() {
        let node = HostExpr::StaticProperty {
            ty: HostType::Class("System.Environment".into()),
            property: PropertyInfo {
                declaring_type: HostType::Class("System.Environment".into()),
                name: "NewLine".into(),
                property_type: HostType::string(),
                is_static: true,
                writable: false,
            },
            site: site(),
        };
        assert!(!node.is_assignable());
        assert_eq!(node.host_type(), Some(HostType::string()));
    }
}
