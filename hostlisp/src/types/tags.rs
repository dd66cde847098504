//! Short primitive and primitive-array tags.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{HostType, PrimitiveKind};

/// Every documented tag, in declaration order.
pub const PRIMITIVE_TAGS: &[&str] = &[
    "bool", "boolean", "char", "sbyte", "byte", "short", "ushort", "int", "uint", "long", "ulong",
    "float", "double", "decimal", "bools", "booleans", "chars", "sbytes", "bytes", "shorts",
    "ushorts", "ints", "uints", "longs", "ulongs", "floats", "doubles", "decimals", "objects",
];

static TAG_TABLE: Lazy<HashMap<&'static str, HostType>> = Lazy::new(|| {
    use PrimitiveKind::*;

    let scalars: [(&str, &str, PrimitiveKind); 12] = [
        ("char", "chars", Char),
        ("sbyte", "sbytes", SByte),
        ("byte", "bytes", Byte),
        ("short", "shorts", Int16),
        ("ushort", "ushorts", UInt16),
        ("int", "ints", Int32),
        ("uint", "uints", UInt32),
        ("long", "longs", Int64),
        ("ulong", "ulongs", UInt64),
        ("float", "floats", Single),
        ("double", "doubles", Double),
        ("decimal", "decimals", Decimal),
    ];

    let mut table = HashMap::new();
    for (scalar, array, kind) in scalars {
        table.insert(scalar, HostType::Primitive(kind));
        table.insert(array, HostType::array_of(HostType::Primitive(kind)));
    }
    for tag in ["bool", "boolean"] {
        table.insert(tag, HostType::Primitive(Boolean));
    }
    for tag in ["bools", "booleans"] {
        table.insert(tag, HostType::array_of(HostType::Primitive(Boolean)));
    }
    table.insert("objects", HostType::array_of(HostType::object()));
    table
});

/// Look up a short tag such as `int` or `doubles`.
pub fn primitive_tag(tag: &str) -> Option<&'static HostType> {
    TAG_TABLE.get(tag)
}
