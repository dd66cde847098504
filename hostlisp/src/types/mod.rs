//! Host platform type model.
//!
//! The host platform has a static, closed set of primitive scalar kinds plus
//! nominal value types (structs), reference types (classes) and arrays.
//!
//! ```text
//! HostType
//!  ├── Primitive(kind)   Boolean, Char, SByte .. UInt64, Single, Double,
//!  │                     Decimal, IntPtr, UIntPtr
//!  ├── Void              the no-value return type
//!  ├── Struct(name)      non-primitive value type
//!  ├── Class(name)       reference type
//!  └── Array(element)    reference type
//! ```
//!
//! # Sub-modules
//!
//! - `tags`: the short primitive / primitive-array tag table

mod tags;

#[cfg(test)]
mod tests;

pub use tags::{primitive_tag, PRIMITIVE_TAGS};

use std::fmt;

use hostlisp_reader::NoEmbed;
use serde::{Deserialize, Serialize};

/// Name of the root reference type.
pub const OBJECT_TYPE_NAME: &str = "System.Object";
pub const STRING_TYPE_NAME: &str = "System.String";
pub const VOID_TYPE_NAME: &str = "System.Void";

/// Suffix marking an array type name.
pub const ARRAY_SUFFIX: &str = "[]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    /// Pointer-sized signed integer
    IntPtr,
    /// Pointer-sized unsigned integer
    UIntPtr,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 15] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Char,
        PrimitiveKind::SByte,
        PrimitiveKind::Byte,
        PrimitiveKind::Int16,
        PrimitiveKind::UInt16,
        PrimitiveKind::Int32,
        PrimitiveKind::UInt32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt64,
        PrimitiveKind::Single,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
        PrimitiveKind::IntPtr,
        PrimitiveKind::UIntPtr,
    ];

    /// Fully qualified host name, e.g. `System.Int32`.
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "System.Boolean",
            PrimitiveKind::Char => "System.Char",
            PrimitiveKind::SByte => "System.SByte",
            PrimitiveKind::Byte => "System.Byte",
            PrimitiveKind::Int16 => "System.Int16",
            PrimitiveKind::UInt16 => "System.UInt16",
            PrimitiveKind::Int32 => "System.Int32",
            PrimitiveKind::UInt32 => "System.UInt32",
            PrimitiveKind::Int64 => "System.Int64",
            PrimitiveKind::UInt64 => "System.UInt64",
            PrimitiveKind::Single => "System.Single",
            PrimitiveKind::Double => "System.Double",
            PrimitiveKind::Decimal => "System.Decimal",
            PrimitiveKind::IntPtr => "System.IntPtr",
            PrimitiveKind::UIntPtr => "System.UIntPtr",
        }
    }

    pub fn from_type_name(name: &str) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.type_name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostType {
    Primitive(PrimitiveKind),
    Void,
    /// Non-primitive value type
    Struct(String),
    /// Reference type
    Class(String),
    Array(Box<HostType>),
}

impl HostType {
    pub fn object() -> HostType {
        HostType::Class(OBJECT_TYPE_NAME.to_string())
    }

    pub fn string() -> HostType {
        HostType::Class(STRING_TYPE_NAME.to_string())
    }

    pub fn array_of(element: HostType) -> HostType {
        HostType::Array(Box::new(element))
    }

    /// Fully qualified name, with `[]` appended per array rank.
    pub fn name(&self) -> String {
        match self {
            HostType::Primitive(kind) => kind.type_name().to_string(),
            HostType::Void => VOID_TYPE_NAME.to_string(),
            HostType::Struct(name) | HostType::Class(name) => name.clone(),
            HostType::Array(element) => format!("{}{}", element.name(), ARRAY_SUFFIX),
        }
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            HostType::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, HostType::Primitive(_))
    }

    /// Value types are copied by value and must be boxed to travel as objects.
    pub fn is_value_type(&self) -> bool {
        matches!(self, HostType::Primitive(_) | HostType::Struct(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, HostType::Void)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, HostType::Class(name) if name == OBJECT_TYPE_NAME)
    }

    pub fn element_type(&self) -> Option<&HostType> {
        match self {
            HostType::Array(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<PrimitiveKind> for HostType {
    fn from(kind: PrimitiveKind) -> Self {
        HostType::Primitive(kind)
    }
}

impl From<NoEmbed> for HostType {
    fn from(never: NoEmbed) -> Self {
        match never {}
    }
}

/// Checked vs unchecked numeric narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverflowMode {
    /// Narrowing that loses information raises an error
    #[default]
    Checked,
    /// Narrowing wraps silently
    Unchecked,
}

impl OverflowMode {
    pub fn from_unchecked_flag(unchecked: bool) -> Self {
        if unchecked {
            OverflowMode::Unchecked
        } else {
            OverflowMode::Checked
        }
    }

    /// The other mode.
    pub fn flipped(self) -> Self {
        match self {
            OverflowMode::Checked => OverflowMode::Unchecked,
            OverflowMode::Unchecked => OverflowMode::Checked,
        }
    }
}
