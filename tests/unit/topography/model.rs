use super::*;
use crate::foundation::error::ErrorKind;
use serde_json::json;

fn rect(id: ObjectId, x: i64, y: i64, w: i64, h: i64) -> TopographyObject {
    TopographyObject::rectangular(id, x, y, w, h)
}

fn basic_topography() -> Topography {
    let mut topo = Topography::new(200, 200);
    topo.add_sources([rect(1, 5, 5, 1, 1)])
        .unwrap()
        .add_targets([rect(2, 95, 95, 1, 1)])
        .unwrap()
        .add_obstacles([rect(3, 50, 50, 1, 1)])
        .unwrap();
    topo
}

#[test]
fn builder_populates_collections() {
    let topo = basic_topography();
    assert_eq!(topo.width(), 200);
    assert_eq!(topo.height(), 200);
    assert_eq!(topo.sources(), &[rect(1, 5, 5, 1, 1)]);
    assert_eq!(topo.targets(), &[rect(2, 95, 95, 1, 1)]);
    assert_eq!(topo.obstacles(), &[rect(3, 50, 50, 1, 1)]);
    assert_eq!(topo.object_count(), 3);
    assert!(topo.contains_id(2));
}

#[test]
fn add_rejects_objects_outside_area() {
    let err = Topography::new(100, 100)
        .add_sources([rect(1, 105, 105, 1, 1)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryViolation);
    assert!(err.to_string().contains("x=105"));

    let err = Topography::new(100, 100)
        .add_targets([rect(1, -21, -21, 1, 1)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryViolation);

    let err = Topography::new(100, 100)
        .add_obstacles([rect(1, 5, 5, 0, 1)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryViolation);
}

#[test]
fn add_rejects_objects_flush_with_edge() {
    let mut topo = Topography::new(100, 100);
    assert!(topo.add_sources([rect(1, 99, 5, 1, 1)]).is_err());
    assert!(topo.add_sources([rect(2, 5, 99, 1, 1)]).is_err());
    assert!(topo.add_sources([rect(3, 98, 98, 1, 1)]).is_ok());
}

#[test]
fn non_positive_dimensions_accept_nothing() {
    let mut topo = Topography::new(0, -5);
    assert!(topo.sources().is_empty());
    let err = topo.add_sources([rect(1, 0, 0, 1, 1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryViolation);
}

#[test]
fn duplicate_ids_are_global_across_collections() {
    let mut topo = Topography::new(100, 100);
    topo.add_sources([rect(1, 5, 5, 1, 1)]).unwrap();
    let err = topo.add_targets([rect(1, 25, 25, 1, 1)]).unwrap_err();
    assert!(matches!(err, CmsError::DuplicateTopographyObjectId(1)));

    let mut topo = Topography::new(100, 100);
    topo.add_targets([rect(1, 5, 5, 1, 1)]).unwrap();
    let err = topo.add_sources([rect(1, 25, 25, 1, 1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);

    let mut topo = Topography::new(100, 100);
    topo.add_sources([rect(1, 5, 5, 1, 1)]).unwrap();
    let err = topo.add_obstacles([rect(1, 25, 25, 1, 1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);
}

#[test]
fn geometry_is_checked_before_identity() {
    let mut topo = Topography::new(100, 100);
    topo.add_sources([rect(1, 5, 5, 1, 1)]).unwrap();
    let err = topo.add_sources([rect(1, 500, 5, 1, 1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryViolation);
}

#[test]
fn failed_add_keeps_earlier_objects() {
    let mut topo = Topography::new(100, 100);
    let err = topo
        .add_sources([
            rect(1, 5, 5, 1, 1),
            rect(2, 6, 6, 1, 1),
            rect(1, 7, 7, 1, 1),
            rect(4, 8, 8, 1, 1),
        ])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);
    assert_eq!(topo.sources().len(), 2);
    assert!(topo.contains_id(2));
    assert!(!topo.contains_id(4));
}

#[test]
fn object_lookup_reports_role() {
    let topo = basic_topography();
    let (role, obj) = topo.object(2).unwrap();
    assert_eq!(role, ObjectRole::Target);
    assert_eq!(obj.x, 95);
    assert!(topo.object(9).is_none());

    let roles: Vec<_> = topo.objects().map(|(role, obj)| (role, obj.id)).collect();
    assert_eq!(
        roles,
        vec![
            (ObjectRole::Source, 1),
            (ObjectRole::Target, 2),
            (ObjectRole::Obstacle, 3)
        ]
    );
}

#[test]
fn representation_roundtrip() {
    let topo = basic_topography();
    let back = Topography::from_representation(&topo.to_representation()).unwrap();
    assert_eq!(back, topo);
}

#[test]
fn representation_shape() {
    let v = basic_topography().to_representation();
    assert_eq!(v["width"], json!(200));
    assert_eq!(v["height"], json!(200));
    assert_eq!(
        v["obstacles"],
        json!([{"id": 3, "x": 50, "y": 50, "width": 1, "height": 1, "type": "RECTANGULAR"}])
    );
}

#[test]
fn reconstruction_names_missing_keys() {
    let full = basic_topography().to_representation();
    for key in ["sources", "targets", "obstacles", "width", "height"] {
        let mut v = full.clone();
        v.as_object_mut().unwrap().remove(key);
        let err = Topography::from_representation(&v).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput, "{key}");
        assert!(err.to_string().contains(key), "{err}");
    }
}

#[test]
fn reconstruction_rejects_unknown_type_in_any_collection() {
    for key in ["sources", "targets", "obstacles"] {
        let mut v = basic_topography().to_representation();
        v[key][0]["type"] = json!("TRIANGULAR");
        let err = Topography::from_representation(&v).unwrap_err();
        assert!(
            matches!(err, CmsError::UndefinedTopographyObjectType(ref t) if t == "TRIANGULAR"),
            "{key}: {err}"
        );
    }
}

#[test]
fn reconstruction_applies_builder_invariants() {
    let dup = json!({
        "width": 100, "height": 100,
        "sources": [{"id": 1, "x": 5, "y": 5, "width": 1, "height": 1, "type": "RECTANGULAR"}],
        "targets": [],
        "obstacles": [{"id": 1, "x": 9, "y": 9, "width": 1, "height": 1, "type": "RECTANGULAR"}]
    });
    let err = Topography::from_representation(&dup).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);

    let outside = json!({
        "width": 10, "height": 10,
        "sources": [],
        "targets": [{"id": 1, "x": 9, "y": 5, "width": 1, "height": 1, "type": "RECTANGULAR"}],
        "obstacles": []
    });
    let err = Topography::from_representation(&outside).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryViolation);
}

#[test]
fn reconstruction_rejects_malformed_values() {
    let v = json!({"width": "wide", "height": 10, "sources": [], "targets": [], "obstacles": []});
    assert_eq!(
        Topography::from_representation(&v).unwrap_err().kind(),
        ErrorKind::MalformedInput
    );

    let v = json!({"width": 10, "height": 10, "sources": {}, "targets": [], "obstacles": []});
    assert_eq!(
        Topography::from_representation(&v).unwrap_err().kind(),
        ErrorKind::MalformedInput
    );

    assert_eq!(
        Topography::from_representation(&json!([])).unwrap_err().kind(),
        ErrorKind::MalformedInput
    );
}

#[test]
fn bounds_cover_area() {
    let r = Topography::new(30, 20).bounds();
    assert_eq!((r.width(), r.height()), (30.0, 20.0));
    assert!(Topography::new(30, 20).contains_position(Position::new(29, 19)));
    assert!(!Topography::new(30, 20).contains_position(Position::new(30, 0)));
}
