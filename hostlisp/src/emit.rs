//! Lowering expressions to a flat instruction list.
//!
//! The stack discipline is simple: every expression leaves exactly one
//! object on the stack. Host members work on unboxed values, so arguments
//! are converted with [`plan_unbox`] before a bound call and results are
//! boxed with [`box_return`] afterwards. Store instructions leave the
//! stored value on the stack.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coercion::{box_return, plan_unbox, BoxAction, CastRoutine, UnboxPlan};
use crate::error::{InteropError, InteropResult};
use crate::ir::{Expr, HostExpr, Literal, MethodCall, ParamDescriptor};
use crate::types::{HostType, OverflowMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instr {
    LoadConst(Literal),
    LoadLocal(usize),
    /// Address of a local, for by-ref arguments
    LoadLocalAddress(usize),
    LoadGlobal(String),
    LoadType(String),
    LoadNull,

    /// Convert the object on top of the stack with a named routine.
    Convert(CastRoutine),
    UnboxValue(String),
    CastClass(String),
    Box(String),

    LoadStaticField { ty: String, field: String },
    StoreStaticField { ty: String, field: String },
    LoadField { ty: String, field: String },
    StoreField { ty: String, field: String },
    GetStaticProperty { ty: String, property: String },
    SetStaticProperty { ty: String, property: String },
    GetProperty { ty: String, property: String },
    SetProperty { ty: String, property: String },
    CallStatic { ty: String, method: String, arity: usize, type_args: Vec<String> },
    CallVirtual { ty: String, method: String, arity: usize, type_args: Vec<String> },

    /// Run-time member lookup on the instance below the arguments.
    InvokeReflective { method: String, arity: usize, type_args: Vec<String> },
    InvokeStaticReflective { ty: String, method: String, arity: usize, type_args: Vec<String> },
    GetMemberReflective { member: String },
    SetMemberReflective { member: String },
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::LoadConst(lit) => write!(f, "ldconst {:?}", lit),
            Instr::LoadLocal(i) => write!(f, "ldloc {}", i),
            Instr::LoadLocalAddress(i) => write!(f, "ldloca {}", i),
            Instr::LoadGlobal(name) => write!(f, "ldglobal {}", name),
            Instr::LoadType(ty) => write!(f, "ldtype {}", ty),
            Instr::LoadNull => write!(f, "ldnull"),
            Instr::Convert(routine) => write!(f, "call {}", routine),
            Instr::UnboxValue(ty) => write!(f, "unbox {}", ty),
            Instr::CastClass(ty) => write!(f, "castclass {}", ty),
            Instr::Box(ty) => write!(f, "box {}", ty),
            Instr::LoadStaticField { ty, field } => write!(f, "ldsfld {}::{}", ty, field),
            Instr::StoreStaticField { ty, field } => write!(f, "stsfld {}::{}", ty, field),
            Instr::LoadField { ty, field } => write!(f, "ldfld {}::{}", ty, field),
            Instr::StoreField { ty, field } => write!(f, "stfld {}::{}", ty, field),
            Instr::GetStaticProperty { ty, property } => {
                write!(f, "call {}::get_{}", ty, property)
            }
            Instr::SetStaticProperty { ty, property } => {
                write!(f, "call {}::set_{}", ty, property)
            }
            Instr::GetProperty { ty, property } => write!(f, "callvirt {}::get_{}", ty, property),
            Instr::SetProperty { ty, property } => write!(f, "callvirt {}::set_{}", ty, property),
            Instr::CallStatic {
                ty, method, arity, ..
            } => write!(f, "call {}::{}/{}", ty, method, arity),
            Instr::CallVirtual {
                ty, method, arity, ..
            } => write!(f, "callvirt {}::{}/{}", ty, method, arity),
            Instr::InvokeReflective { method, arity, .. } => {
                write!(f, "invoke-reflective {}/{}", method, arity)
            }
            Instr::InvokeStaticReflective {
                ty, method, arity, ..
            } => write!(f, "invoke-reflective {}::{}/{}", ty, method, arity),
            Instr::GetMemberReflective { member } => write!(f, "get-member {}", member),
            Instr::SetMemberReflective { member } => write!(f, "set-member {}", member),
        }
    }
}

/// Accumulates instructions for one or more expressions.
#[derive(Debug, Default)]
pub struct Emitter {
    code: Vec<Instr>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<Instr> {
        self.code
    }

    fn push(&mut self, instr: Instr) {
        self.code.push(instr);
    }

    pub fn emit(&mut self, expr: &Expr) -> InteropResult<()> {
        match expr {
            Expr::Constant(lit) => self.push(Instr::LoadConst(lit.clone())),
            Expr::Local(binding) => self.push(Instr::LoadLocal(binding.index)),
            Expr::Global(name) => self.push(Instr::LoadGlobal(name.clone())),
            Expr::TypeRef(ty) => self.push(Instr::LoadType(ty.name())),
            Expr::Host(host) => self.emit_host(host)?,
            Expr::Assign {
                target,
                value,
                overflow,
                ..
            } => self.emit_assign(target, value, *overflow)?,
        }
        Ok(())
    }

    pub fn emit_host(&mut self, node: &HostExpr) -> InteropResult<()> {
        match node {
            HostExpr::StaticField { ty, field, .. } => {
                self.push(Instr::LoadStaticField {
                    ty: ty.name(),
                    field: field.name.clone(),
                });
                self.emit_box(&field.field_type);
            }
            HostExpr::StaticProperty { ty, property, .. } => {
                self.push(Instr::GetStaticProperty {
                    ty: ty.name(),
                    property: property.name.clone(),
                });
                self.emit_box(&property.property_type);
            }
            HostExpr::StaticMethod { ty, call, .. } => {
                self.emit_args(call)?;
                let type_args = type_arg_names(call);
                match &call.method {
                    Some(method) => {
                        self.push(Instr::CallStatic {
                            ty: ty.name(),
                            method: call.name.clone(),
                            arity: call.arity(),
                            type_args,
                        });
                        self.emit_box(&method.return_type);
                    }
                    None => self.push(Instr::InvokeStaticReflective {
                        ty: ty.name(),
                        method: call.name.clone(),
                        arity: call.arity(),
                        type_args,
                    }),
                }
            }
            HostExpr::InstanceField { target, name, field, .. } => match field {
                Some(field) => {
                    self.emit_target(target, &field.declaring_type)?;
                    self.push(Instr::LoadField {
                        ty: field.declaring_type.name(),
                        field: field.name.clone(),
                    });
                    self.emit_box(&field.field_type);
                }
                None => {
                    self.emit(target)?;
                    self.push(Instr::GetMemberReflective {
                        member: name.clone(),
                    });
                }
            },
            HostExpr::InstanceProperty {
                target, property, ..
            } => {
                self.emit_target(target, &property.declaring_type)?;
                self.push(Instr::GetProperty {
                    ty: property.declaring_type.name(),
                    property: property.name.clone(),
                });
                self.emit_box(&property.property_type);
            }
            HostExpr::InstanceMethod { target, call, .. } => {
                let type_args = type_arg_names(call);
                match &call.method {
                    Some(method) => {
                        self.emit_target(target, &method.declaring_type)?;
                        self.emit_args(call)?;
                        self.push(Instr::CallVirtual {
                            ty: method.declaring_type.name(),
                            method: call.name.clone(),
                            arity: call.arity(),
                            type_args,
                        });
                        self.emit_box(&method.return_type);
                    }
                    None => {
                        self.emit(target)?;
                        self.emit_args(call)?;
                        self.push(Instr::InvokeReflective {
                            method: call.name.clone(),
                            arity: call.arity(),
                            type_args,
                        });
                    }
                }
            }
            HostExpr::InstanceDynamicZeroArityCall { target, name, .. } => {
                self.emit(target)?;
                self.push(Instr::GetMemberReflective {
                    member: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Store `value` into a field or property node, leaving the boxed value
    /// on the stack.
    pub fn emit_assign(
        &mut self,
        target: &HostExpr,
        value: &Expr,
        overflow: OverflowMode,
    ) -> InteropResult<()> {
        let invalid = || InteropError::InvalidAssignTarget {
            target: format!("{} {}", target.kind_name(), target.member_name()),
            span: target.site().span,
        };
        if !target.is_assignable() {
            return Err(invalid());
        }

        match target {
            HostExpr::StaticField { ty, field, .. } => {
                self.emit_value(value, &field.field_type, overflow)?;
                self.push(Instr::StoreStaticField {
                    ty: ty.name(),
                    field: field.name.clone(),
                });
                self.emit_box(&field.field_type);
            }
            HostExpr::StaticProperty { ty, property, .. } => {
                self.emit_value(value, &property.property_type, overflow)?;
                self.push(Instr::SetStaticProperty {
                    ty: ty.name(),
                    property: property.name.clone(),
                });
                self.emit_box(&property.property_type);
            }
            HostExpr::InstanceField {
                target: instance,
                field: Some(field),
                ..
            } => {
                self.emit_target(instance, &field.declaring_type)?;
                self.emit_value(value, &field.field_type, overflow)?;
                self.push(Instr::StoreField {
                    ty: field.declaring_type.name(),
                    field: field.name.clone(),
                });
                self.emit_box(&field.field_type);
            }
            HostExpr::InstanceField {
                target: instance,
                name,
                field: None,
                ..
            } => {
                self.emit(instance)?;
                self.emit(value)?;
                self.push(Instr::SetMemberReflective {
                    member: name.clone(),
                });
            }
            HostExpr::InstanceProperty {
                target: instance,
                property,
                ..
            } => {
                self.emit_target(instance, &property.declaring_type)?;
                self.emit_value(value, &property.property_type, overflow)?;
                self.push(Instr::SetProperty {
                    ty: property.declaring_type.name(),
                    property: property.name.clone(),
                });
                self.emit_box(&property.property_type);
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }

    fn emit_args(&mut self, call: &MethodCall) -> InteropResult<()> {
        let param_types = call.method.as_ref().map(|m| m.params.as_slice());
        for (i, param) in call.params.iter().enumerate() {
            match param {
                ParamDescriptor::ByRef { local, .. } => {
                    self.push(Instr::LoadLocalAddress(local.index));
                }
                ParamDescriptor::Standard(expr) => {
                    match param_types.and_then(|types| types.get(i)) {
                        Some(ty) => self.emit_value(expr, ty, call.overflow)?,
                        None => self.emit(expr)?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Emit an object-producing expression and convert it to `ty`.
    fn emit_value(&mut self, expr: &Expr, ty: &HostType, overflow: OverflowMode) -> InteropResult<()> {
        self.emit(expr)?;
        self.emit_unbox(&plan_unbox(ty, overflow)?);
        Ok(())
    }

    /// Emit an instance target converted to the member's declaring type.
    /// Value-type targets are always unboxed; a reference target skips the
    /// cast when it is statically known to be the declaring type.
    fn emit_target(&mut self, target: &Expr, declaring: &HostType) -> InteropResult<()> {
        self.emit(target)?;
        if declaring.is_value_type() || target.host_type().as_ref() != Some(declaring) {
            self.emit_unbox(&plan_unbox(declaring, OverflowMode::Checked)?);
        }
        Ok(())
    }

    fn emit_unbox(&mut self, plan: &UnboxPlan) {
        match plan {
            UnboxPlan::Routine(routine) => self.push(Instr::Convert(*routine)),
            UnboxPlan::UnboxValue(ty) => self.push(Instr::UnboxValue(ty.name())),
            UnboxPlan::Downcast(ty) => self.push(Instr::CastClass(ty.name())),
            UnboxPlan::Identity => {}
        }
    }

    fn emit_box(&mut self, result_type: &HostType) {
        match box_return(result_type) {
            BoxAction::Box(ty) => self.push(Instr::Box(ty.name())),
            BoxAction::NullMarker => self.push(Instr::LoadNull),
            BoxAction::PassThrough => {}
        }
    }
}

fn type_arg_names(call: &MethodCall) -> Vec<String> {
    call.type_args().iter().map(HostType::name).collect()
}

/// Emit a single expression.
pub fn emit_expr(expr: &Expr) -> InteropResult<Vec<Instr>> {
    let mut emitter = Emitter::new();
    emitter.emit(expr)?;
    Ok(emitter.finish())
}
