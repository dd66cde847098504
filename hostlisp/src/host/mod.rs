//! Host platform queries.
//!
//! The interop analyzer never inspects host metadata directly. It asks two
//! oracles: [`TypeLookup`] for names and [`MemberResolver`] for members.
//! Both are pure queries; neither ranks overloads beyond what the
//! implementation decides to return.

mod catalog;

pub use catalog::{CatalogError, HostCatalog, BUILTIN_CATALOG};

use serde::{Deserialize, Serialize};

use crate::types::HostType;

/// Global type-name lookup.
pub trait TypeLookup {
    /// Find a type by fully qualified name. `None` means not found.
    fn find_type(&self, name: &str) -> Option<HostType>;
}

/// Member-resolution oracle.
///
/// `is_static` selects static members when true, instance members otherwise.
pub trait MemberResolver {
    fn find_field(&self, ty: &HostType, name: &str, is_static: bool) -> Option<FieldInfo>;

    fn find_property(&self, ty: &HostType, name: &str, is_static: bool) -> Option<PropertyInfo>;

    fn find_zero_arity_method(
        &self,
        ty: &HostType,
        name: &str,
        is_static: bool,
    ) -> Option<MethodInfo>;

    /// Overload selection for calls with arguments.
    fn find_method(
        &self,
        ty: &HostType,
        name: &str,
        arity: usize,
        is_static: bool,
    ) -> Option<MethodInfo>;
}

/// Everything the analyzer needs from the host.
pub trait HostEnvironment: TypeLookup + MemberResolver {}

impl<T: TypeLookup + MemberResolver + ?Sized> HostEnvironment for T {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub declaring_type: HostType,
    pub name: String,
    pub field_type: HostType,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub declaring_type: HostType,
    pub name: String,
    pub property_type: HostType,
    pub is_static: bool,
    pub writable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub declaring_type: HostType,
    pub name: String,
    pub params: Vec<HostType>,
    pub return_type: HostType,
    pub is_static: bool,
    /// Number of generic type parameters (0 for non-generic methods)
    pub generic_arity: usize,
}

impl MethodInfo {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_generic(&self) -> bool {
        self.generic_arity > 0
    }
}
