//! Tree-walking evaluation against a host runtime.
//!
//! This crate has no value representation of its own. A [`HostRuntime`]
//! supplies values and performs the actual member accesses; evaluation
//! only sequences them in source order.

use crate::coercion::{plan_unbox, UnboxPlan};
use crate::context::LocalBinding;
use crate::error::InteropError;
use crate::host::{FieldInfo, MethodInfo, PropertyInfo};
use crate::ir::{Expr, HostExpr, Literal, MethodCall, ParamDescriptor};
use crate::types::{HostType, OverflowMode};

/// Receiver of a member access.
#[derive(Debug, Clone, Copy)]
pub enum Receiver<'v, V> {
    Static(&'v HostType),
    Instance(&'v V),
}

/// An evaluated argument. By-ref arguments are written back to their local
/// after the call.
#[derive(Debug, Clone)]
pub struct Argument<'e, V> {
    pub value: V,
    pub by_ref: Option<&'e LocalBinding>,
}

pub trait HostRuntime {
    type Value;
    type Error: From<InteropError>;

    fn constant(&mut self, literal: &Literal) -> Result<Self::Value, Self::Error>;
    fn load_local(&mut self, binding: &LocalBinding) -> Result<Self::Value, Self::Error>;
    fn store_local(
        &mut self,
        binding: &LocalBinding,
        value: Self::Value,
    ) -> Result<(), Self::Error>;
    fn load_global(&mut self, name: &str) -> Result<Self::Value, Self::Error>;
    fn type_object(&mut self, ty: &HostType) -> Result<Self::Value, Self::Error>;

    /// Convert a value for a parameter or store of the planned type.
    fn convert(
        &mut self,
        value: Self::Value,
        plan: &UnboxPlan,
    ) -> Result<Self::Value, Self::Error>;

    fn get_field(
        &mut self,
        receiver: Receiver<'_, Self::Value>,
        field: &FieldInfo,
    ) -> Result<Self::Value, Self::Error>;
    fn set_field(
        &mut self,
        receiver: Receiver<'_, Self::Value>,
        field: &FieldInfo,
        value: Self::Value,
    ) -> Result<Self::Value, Self::Error>;
    fn get_property(
        &mut self,
        receiver: Receiver<'_, Self::Value>,
        property: &PropertyInfo,
    ) -> Result<Self::Value, Self::Error>;
    fn set_property(
        &mut self,
        receiver: Receiver<'_, Self::Value>,
        property: &PropertyInfo,
        value: Self::Value,
    ) -> Result<Self::Value, Self::Error>;

    /// Call a bound method. The runtime may update by-ref argument values.
    fn invoke(
        &mut self,
        receiver: Receiver<'_, Self::Value>,
        method: &MethodInfo,
        type_args: &[HostType],
        args: &mut [Argument<'_, Self::Value>],
    ) -> Result<Self::Value, Self::Error>;

    /// Call a method found by name at run time.
    fn invoke_reflective(
        &mut self,
        receiver: Receiver<'_, Self::Value>,
        name: &str,
        type_args: &[HostType],
        args: &mut [Argument<'_, Self::Value>],
    ) -> Result<Self::Value, Self::Error>;

    /// Read a zero-arity member (field, property or method) found by name.
    fn get_member_reflective(
        &mut self,
        target: &Self::Value,
        name: &str,
    ) -> Result<Self::Value, Self::Error>;
    fn set_member_reflective(
        &mut self,
        target: &Self::Value,
        name: &str,
        value: Self::Value,
    ) -> Result<Self::Value, Self::Error>;
}

impl Expr {
    pub fn eval<R: HostRuntime>(&self, rt: &mut R) -> Result<R::Value, R::Error> {
        match self {
            Expr::Constant(lit) => rt.constant(lit),
            Expr::Local(binding) => rt.load_local(binding),
            Expr::Global(name) => rt.load_global(name),
            Expr::TypeRef(ty) => rt.type_object(ty),
            Expr::Host(host) => host.eval(rt),
            Expr::Assign {
                target,
                value,
                overflow,
                ..
            } => target.eval_assign(rt, value, *overflow),
        }
    }
}

impl HostExpr {
    pub fn eval<R: HostRuntime>(&self, rt: &mut R) -> Result<R::Value, R::Error> {
        match self {
            HostExpr::StaticField { ty, field, .. } => rt.get_field(Receiver::Static(ty), field),
            HostExpr::StaticProperty { ty, property, .. } => {
                rt.get_property(Receiver::Static(ty), property)
            }
            HostExpr::StaticMethod { ty, call, .. } => eval_call(rt, Receiver::Static(ty), call),
            HostExpr::InstanceField {
                target, name, field, ..
            } => {
                let instance = target.eval(rt)?;
                match field {
                    Some(field) => rt.get_field(Receiver::Instance(&instance), field),
                    None => rt.get_member_reflective(&instance, name),
                }
            }
            HostExpr::InstanceProperty {
                target, property, ..
            } => {
                let instance = target.eval(rt)?;
                rt.get_property(Receiver::Instance(&instance), property)
            }
            HostExpr::InstanceMethod { target, call, .. } => {
                let instance = target.eval(rt)?;
                eval_call(rt, Receiver::Instance(&instance), call)
            }
            HostExpr::InstanceDynamicZeroArityCall { target, name, .. } => {
                let instance = target.eval(rt)?;
                rt.get_member_reflective(&instance, name)
            }
        }
    }

    /// Evaluate `value` and store it through this node.
    pub fn eval_assign<R: HostRuntime>(
        &self,
        rt: &mut R,
        value: &Expr,
        overflow: OverflowMode,
    ) -> Result<R::Value, R::Error> {
        if !self.is_assignable() {
            return Err(InteropError::InvalidAssignTarget {
                target: format!("{} {}", self.kind_name(), self.member_name()),
                span: self.site().span,
            }
            .into());
        }

        match self {
            HostExpr::StaticField { ty, field, .. } => {
                let v = eval_converted(rt, value, &field.field_type, overflow)?;
                rt.set_field(Receiver::Static(ty), field, v)
            }
            HostExpr::StaticProperty { ty, property, .. } => {
                let v = eval_converted(rt, value, &property.property_type, overflow)?;
                rt.set_property(Receiver::Static(ty), property, v)
            }
            HostExpr::InstanceField {
                target, name, field, ..
            } => {
                let instance = target.eval(rt)?;
                match field {
                    Some(field) => {
                        let v = eval_converted(rt, value, &field.field_type, overflow)?;
                        rt.set_field(Receiver::Instance(&instance), field, v)
                    }
                    None => {
                        let v = value.eval(rt)?;
                        rt.set_member_reflective(&instance, name, v)
                    }
                }
            }
            HostExpr::InstanceProperty {
                target, property, ..
            } => {
                let instance = target.eval(rt)?;
                let v = eval_converted(rt, value, &property.property_type, overflow)?;
                rt.set_property(Receiver::Instance(&instance), property, v)
            }
            _ => Err(InteropError::InvalidAssignTarget {
                target: format!("{} {}", self.kind_name(), self.member_name()),
                span: self.site().span,
            }
            .into()),
        }
    }
}

fn eval_converted<R: HostRuntime>(
    rt: &mut R,
    expr: &Expr,
    ty: &HostType,
    overflow: OverflowMode,
) -> Result<R::Value, R::Error> {
    let value = expr.eval(rt)?;
    let plan = plan_unbox(ty, overflow).map_err(InteropError::from)?;
    match plan {
        UnboxPlan::Identity => Ok(value),
        plan => rt.convert(value, &plan),
    }
}

fn eval_call<R: HostRuntime>(
    rt: &mut R,
    receiver: Receiver<'_, R::Value>,
    call: &MethodCall,
) -> Result<R::Value, R::Error> {
    let param_types = call.method.as_ref().map(|m| m.params.as_slice());

    let mut args = Vec::with_capacity(call.params.len());
    for (i, param) in call.params.iter().enumerate() {
        let arg = match param {
            ParamDescriptor::ByRef { local, .. } => Argument {
                value: rt.load_local(local)?,
                by_ref: Some(local),
            },
            ParamDescriptor::Standard(expr) => {
                let value = match param_types.and_then(|types| types.get(i)) {
                    Some(ty) => eval_converted(rt, expr, ty, call.overflow)?,
                    None => expr.eval(rt)?,
                };
                Argument {
                    value,
                    by_ref: None,
                }
            }
        };
        args.push(arg);
    }

    let result = match &call.method {
        Some(method) => rt.invoke(receiver, method, call.type_args(), &mut args)?,
        None => rt.invoke_reflective(receiver, &call.name, call.type_args(), &mut args)?,
    };

    for arg in args {
        if let Some(local) = arg.by_ref {
            rt.store_local(local, arg.value)?;
        }
    }
    Ok(result)
}
