use super::*;

#[test]
fn test_primitive_names_round_trip() {
    for kind in PrimitiveKind::ALL {
        assert_eq!(PrimitiveKind::from_type_name(kind.type_name()), Some(kind));
    }
    assert_eq!(PrimitiveKind::from_type_name("System.String"), None);
}

#[test]
fn test_array_name() {
    let ty = HostType::array_of(HostType::array_of(PrimitiveKind::Int32.into()));
    assert_eq!(ty.name(), "System.Int32[][]");
    assert_eq!(ty.to_string(), "System.Int32[][]");
}

#[test]
fn test_value_type_classification() {
    assert!(HostType::Primitive(PrimitiveKind::Double).is_value_type());
    assert!(HostType::Struct("System.DateTime".into()).is_value_type());
    assert!(!HostType::string().is_value_type());
    assert!(!HostType::array_of(PrimitiveKind::Byte.into()).is_value_type());
    assert!(!HostType::Void.is_value_type());
    assert!(HostType::object().is_object());
}

#[test]
fn test_every_documented_tag_resolves() {
    for tag in PRIMITIVE_TAGS {
        assert!(primitive_tag(tag).is_some(), "tag {} missing", tag);
    }
    assert_eq!(primitive_tag("Int32"), None);
    assert_eq!(primitive_tag("string"), None);
}

#[test]
fn test_tag_shapes() {
    assert_eq!(
        primitive_tag("int"),
        Some(&HostType::Primitive(PrimitiveKind::Int32))
    );
    assert_eq!(
        primitive_tag("booleans"),
        Some(&HostType::array_of(PrimitiveKind::Boolean.into()))
    );
    assert_eq!(
        primitive_tag("float"),
        Some(&HostType::Primitive(PrimitiveKind::Single))
    );
    assert_eq!(
        primitive_tag("objects").map(|t| t.name()),
        Some("System.Object[]".to_string())
    );
}

#[test]
fn test_overflow_mode_flip() {
    assert_eq!(OverflowMode::default(), OverflowMode::Checked);
    assert_eq!(OverflowMode::Checked.flipped(), OverflowMode::Unchecked);
    assert_eq!(OverflowMode::from_unchecked_flag(true), OverflowMode::Unchecked);
}

#[test]
fn test_primitive_kind_query() {
    let long = HostType::Primitive(PrimitiveKind::Int64);
    assert!(long.is_primitive());
    assert_eq!(long.primitive_kind(), Some(PrimitiveKind::Int64));

    let string = HostType::Class("System.String".into());
    assert!(!string.is_primitive());
    assert_eq!(string.primitive_kind(), None);
    assert_eq!(HostType::Void.primitive_kind(), None);
    assert_eq!(HostType::array_of(long).primitive_kind(), None);
}
