use super::*;

#[test]
fn position_serializes_as_pair() {
    let s = serde_json::to_string(&Position::new(3, 4)).unwrap();
    assert_eq!(s, "[3,4]");
}

#[test]
fn position_accepts_array_and_object() {
    let a: Position = serde_json::from_str("[5, 6]").unwrap();
    let b: Position = serde_json::from_str(r#"{"x": 5, "y": 6}"#).unwrap();
    assert_eq!(a, b);
    assert!(serde_json::from_str::<Position>("[5]").is_err());
    assert!(serde_json::from_str::<Position>("[5.5, 6]").is_err());
}

#[test]
fn containment_is_half_open() {
    assert!(Position::new(0, 0).is_within(10, 10));
    assert!(Position::new(9, 9).is_within(10, 10));
    assert!(!Position::new(10, 5).is_within(10, 10));
    assert!(!Position::new(5, 10).is_within(10, 10));
    assert!(!Position::new(-1, 5).is_within(10, 10));
    assert!(!Position::new(0, 0).is_within(0, 0));
}
