//! Numeric coercion planning for host calls.
//!
//! Arguments travel as objects and must be converted to each parameter's
//! host type before a call; results must be boxed back into objects.
//! The routine for a primitive parameter depends on the overflow mode:
//!
//! | kind        | checked       | unchecked              |
//! |-------------|---------------|------------------------|
//! | Int32       | `intCast`     | `uncheckedIntCast`     |
//! | Double      | `doubleCast`  | `uncheckedDoubleCast`  |
//! | Boolean     | `booleanCast` | `booleanCast`          |
//! | IntPtr      | `intPtrCast`  | `intPtrCast`           |
//!
//! and likewise for every other numeric kind.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;
use crate::types::{HostType, OverflowMode, PrimitiveKind};

/// A named conversion routine from an object to a primitive value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastRoutine {
    BooleanCast,
    CharCast,
    UncheckedCharCast,
    SByteCast,
    UncheckedSByteCast,
    ByteCast,
    UncheckedByteCast,
    ShortCast,
    UncheckedShortCast,
    UShortCast,
    UncheckedUShortCast,
    IntCast,
    UncheckedIntCast,
    UIntCast,
    UncheckedUIntCast,
    LongCast,
    UncheckedLongCast,
    ULongCast,
    UncheckedULongCast,
    FloatCast,
    UncheckedFloatCast,
    DoubleCast,
    UncheckedDoubleCast,
    DecimalCast,
    UncheckedDecimalCast,
    IntPtrCast,
    UIntPtrCast,
}

impl CastRoutine {
    /// Runtime helper name.
    pub fn name(&self) -> &'static str {
        match self {
            CastRoutine::BooleanCast => "booleanCast",
            CastRoutine::CharCast => "charCast",
            CastRoutine::UncheckedCharCast => "uncheckedCharCast",
            CastRoutine::SByteCast => "sbyteCast",
            CastRoutine::UncheckedSByteCast => "uncheckedSByteCast",
            CastRoutine::ByteCast => "byteCast",
            CastRoutine::UncheckedByteCast => "uncheckedByteCast",
            CastRoutine::ShortCast => "shortCast",
            CastRoutine::UncheckedShortCast => "uncheckedShortCast",
            CastRoutine::UShortCast => "ushortCast",
            CastRoutine::UncheckedUShortCast => "uncheckedUShortCast",
            CastRoutine::IntCast => "intCast",
            CastRoutine::UncheckedIntCast => "uncheckedIntCast",
            CastRoutine::UIntCast => "uintCast",
            CastRoutine::UncheckedUIntCast => "uncheckedUIntCast",
            CastRoutine::LongCast => "longCast",
            CastRoutine::UncheckedLongCast => "uncheckedLongCast",
            CastRoutine::ULongCast => "ulongCast",
            CastRoutine::UncheckedULongCast => "uncheckedULongCast",
            CastRoutine::FloatCast => "floatCast",
            CastRoutine::UncheckedFloatCast => "uncheckedFloatCast",
            CastRoutine::DoubleCast => "doubleCast",
            CastRoutine::UncheckedDoubleCast => "uncheckedDoubleCast",
            CastRoutine::DecimalCast => "decimalCast",
            CastRoutine::UncheckedDecimalCast => "uncheckedDecimalCast",
            CastRoutine::IntPtrCast => "intPtrCast",
            CastRoutine::UIntPtrCast => "uintPtrCast",
        }
    }

    pub fn is_unchecked(&self) -> bool {
        self.name().starts_with("unchecked")
    }
}

impl fmt::Display for CastRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static UNBOX_TABLE: Lazy<HashMap<(PrimitiveKind, OverflowMode), CastRoutine>> = Lazy::new(|| {
    use CastRoutine::*;
    use OverflowMode::{Checked, Unchecked};

    let paired: [(PrimitiveKind, CastRoutine, CastRoutine); 12] = [
        (PrimitiveKind::Char, CharCast, UncheckedCharCast),
        (PrimitiveKind::SByte, SByteCast, UncheckedSByteCast),
        (PrimitiveKind::Byte, ByteCast, UncheckedByteCast),
        (PrimitiveKind::Int16, ShortCast, UncheckedShortCast),
        (PrimitiveKind::UInt16, UShortCast, UncheckedUShortCast),
        (PrimitiveKind::Int32, IntCast, UncheckedIntCast),
        (PrimitiveKind::UInt32, UIntCast, UncheckedUIntCast),
        (PrimitiveKind::Int64, LongCast, UncheckedLongCast),
        (PrimitiveKind::UInt64, ULongCast, UncheckedULongCast),
        (PrimitiveKind::Single, FloatCast, UncheckedFloatCast),
        (PrimitiveKind::Double, DoubleCast, UncheckedDoubleCast),
        (PrimitiveKind::Decimal, DecimalCast, UncheckedDecimalCast),
    ];
    let single: [(PrimitiveKind, CastRoutine); 3] = [
        (PrimitiveKind::Boolean, BooleanCast),
        (PrimitiveKind::IntPtr, IntPtrCast),
        (PrimitiveKind::UIntPtr, UIntPtrCast),
    ];

    let mut table = HashMap::new();
    for (kind, checked, unchecked) in paired {
        table.insert((kind, Checked), checked);
        table.insert((kind, Unchecked), unchecked);
    }
    for (kind, routine) in single {
        table.insert((kind, Checked), routine);
        table.insert((kind, Unchecked), routine);
    }
    table
});

/// The routine converting an object to `kind` under `overflow`.
pub fn unbox_routine(
    kind: PrimitiveKind,
    overflow: OverflowMode,
) -> Result<CastRoutine, InvariantViolation> {
    UNBOX_TABLE.get(&(kind, overflow)).copied().ok_or_else(|| {
        InvariantViolation(format!(
            "no conversion routine for {} ({:?})",
            kind.type_name(),
            overflow
        ))
    })
}

/// How an object argument becomes a parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnboxPlan {
    /// Primitive parameter: call the named routine
    Routine(CastRoutine),
    /// Non-primitive value type: unbox in place
    UnboxValue(HostType),
    /// Reference type: checked downcast
    Downcast(HostType),
    /// `System.Object` parameter: nothing to do
    Identity,
}

pub fn plan_unbox(
    param_type: &HostType,
    overflow: OverflowMode,
) -> Result<UnboxPlan, InvariantViolation> {
    match param_type {
        HostType::Primitive(kind) => unbox_routine(*kind, overflow).map(UnboxPlan::Routine),
        HostType::Struct(_) => Ok(UnboxPlan::UnboxValue(param_type.clone())),
        HostType::Void => Err(InvariantViolation(
            "System.Void cannot be a parameter type".to_string(),
        )),
        _ if param_type.is_object() => Ok(UnboxPlan::Identity),
        HostType::Class(_) | HostType::Array(_) => Ok(UnboxPlan::Downcast(param_type.clone())),
    }
}

/// How a member's result becomes an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxAction {
    Box(HostType),
    /// `void` result: push a null marker
    NullMarker,
    PassThrough,
}

pub fn box_return(return_type: &HostType) -> BoxAction {
    if return_type.is_void() {
        BoxAction::NullMarker
    } else if return_type.is_value_type() {
        BoxAction::Box(return_type.clone())
    } else {
        BoxAction::PassThrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_total() {
        for kind in PrimitiveKind::ALL {
            for mode in [OverflowMode::Checked, OverflowMode::Unchecked] {
                assert!(unbox_routine(kind, mode).is_ok(), "{:?} {:?}", kind, mode);
            }
        }
    }

    #[test]
    fn test_flipping_mode_flips_routine() {
        for kind in PrimitiveKind::ALL {
            let checked = unbox_routine(kind, OverflowMode::Checked).unwrap();
            let unchecked = unbox_routine(kind, OverflowMode::Unchecked).unwrap();
            let single = matches!(
                kind,
                PrimitiveKind::Boolean | PrimitiveKind::IntPtr | PrimitiveKind::UIntPtr
            );
            assert_eq!(checked == unchecked, single, "{:?}", kind);
            assert!(!checked.is_unchecked());
            assert_eq!(unchecked.is_unchecked(), !single);
        }
    }

    #[test]
    fn test_routine_names() {
        assert_eq!(
            unbox_routine(PrimitiveKind::Int32, OverflowMode::Checked)
                .unwrap()
                .name(),
            "intCast"
        );
        assert_eq!(
            unbox_routine(PrimitiveKind::UInt64, OverflowMode::Unchecked)
                .unwrap()
                .to_string(),
            "uncheckedULongCast"
        );
    }

    #[test]
    fn test_plan_by_category() {
        let mode = OverflowMode::Checked;
        assert_eq!(
            plan_unbox(&PrimitiveKind::Double.into(), mode).unwrap(),
            UnboxPlan::Routine(CastRoutine::DoubleCast)
        );
        let dt = HostType::Struct("System.DateTime".into());
        assert_eq!(plan_unbox(&dt, mode).unwrap(), UnboxPlan::UnboxValue(dt));
        assert_eq!(
            plan_unbox(&HostType::string(), mode).unwrap(),
            UnboxPlan::Downcast(HostType::string())
        );
        assert_eq!(plan_unbox(&HostType::object(), mode).unwrap(), UnboxPlan::Identity);
        assert!(plan_unbox(&HostType::Void, mode).is_err());
    }

    #[test]
    fn test_box_return() {
        assert_eq!(
            box_return(&PrimitiveKind::Int32.into()),
            BoxAction::Box(PrimitiveKind::Int32.into())
        );
        assert_eq!(box_return(&HostType::Void), BoxAction::NullMarker);
        assert_eq!(box_return(&HostType::string()), BoxAction::PassThrough);
        assert_eq!(
            box_return(&HostType::array_of(PrimitiveKind::Int32.into())),
            BoxAction::PassThrough
        );
    }
}
