use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CmsError::invalid_object("x")
            .to_string()
            .contains("invalid topography object:")
    );
    assert!(
        CmsError::DuplicateTopographyObjectId(7)
            .to_string()
            .contains("duplicate topography object id: 7")
    );
    assert!(
        CmsError::undefined_type("CIRCULAR")
            .to_string()
            .contains("undefined topography object type: CIRCULAR")
    );
    assert!(
        CmsError::topography_reconstruction("x")
            .to_string()
            .contains("topography reconstruction error:")
    );
    assert!(
        CmsError::invalid_step("x")
            .to_string()
            .contains("invalid simulation step:")
    );
    assert!(
        CmsError::SimulationFull { n_steps: 3 }
            .to_string()
            .contains("all 3 steps")
    );
    assert!(
        CmsError::simulation_reconstruction("x")
            .to_string()
            .contains("simulation reconstruction error:")
    );
    assert!(
        CmsError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn kinds_follow_variants() {
    assert_eq!(
        CmsError::invalid_object("x").kind(),
        ErrorKind::GeometryViolation
    );
    assert_eq!(
        CmsError::DuplicateTopographyObjectId(1).kind(),
        ErrorKind::DuplicateIdentity
    );
    assert_eq!(
        CmsError::undefined_type("x").kind(),
        ErrorKind::UnknownDiscriminant
    );
    assert_eq!(
        CmsError::topography_reconstruction("x").kind(),
        ErrorKind::MalformedInput
    );
    assert_eq!(
        CmsError::simulation_reconstruction("x").kind(),
        ErrorKind::MalformedInput
    );
    assert_eq!(
        CmsError::invalid_step("x").kind(),
        ErrorKind::StepContentMismatch
    );
    assert_eq!(
        CmsError::SimulationFull { n_steps: 1 }.kind(),
        ErrorKind::CapacityExceeded
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CmsError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}
