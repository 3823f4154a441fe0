use crate::foundation::core::ObjectId;

/// Convenience result type used across the crate.
pub type CmsResult<T> = Result<T, CmsError>;

/// Top-level error taxonomy used by model APIs.
#[derive(thiserror::Error, Debug)]
pub enum CmsError {
    /// An object does not fit strictly inside its topography, or has non-positive extent.
    #[error("invalid topography object: {0}")]
    InvalidTopographyObject(String),

    /// An object id collides with one already registered in the same topography.
    #[error("duplicate topography object id: {0}")]
    DuplicateTopographyObjectId(ObjectId),

    /// A reconstructed object's `type` tag is not recognized.
    #[error("undefined topography object type: {0}")]
    UndefinedTopographyObjectType(String),

    /// A topography dictionary is missing a required key or carries malformed values.
    #[error("topography reconstruction error: {0}")]
    TopographyReconstruction(String),

    /// A step omits a roster pedestrian or places one outside the topography.
    #[error("invalid simulation step: {0}")]
    InvalidSimulationStep(String),

    /// All `n_steps` steps are already recorded.
    #[error("simulation is full: all {n_steps} steps are recorded")]
    SimulationFull {
        /// Capacity of the simulation.
        n_steps: usize,
    },

    /// A simulation document is missing a required key or carries malformed values.
    #[error("simulation reconstruction error: {0}")]
    SimulationReconstruction(String),

    /// A read-only lookup referenced a step or pedestrian that does not exist.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Errors when serializing or deserializing JSON text.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Payload-free classification of [`CmsError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CmsError::InvalidTopographyObject`].
    GeometryViolation,
    /// See [`CmsError::DuplicateTopographyObjectId`].
    DuplicateIdentity,
    /// See [`CmsError::UndefinedTopographyObjectType`].
    UnknownDiscriminant,
    /// See [`CmsError::TopographyReconstruction`] and [`CmsError::SimulationReconstruction`].
    MalformedInput,
    /// See [`CmsError::InvalidSimulationStep`].
    StepContentMismatch,
    /// See [`CmsError::SimulationFull`].
    CapacityExceeded,
    /// See [`CmsError::InvalidQuery`].
    InvalidQuery,
    /// See [`CmsError::Serde`].
    Serialization,
    /// See [`CmsError::Other`].
    Other,
}

impl CmsError {
    /// Build a [`CmsError::InvalidTopographyObject`] value.
    pub fn invalid_object(msg: impl Into<String>) -> Self {
        Self::InvalidTopographyObject(msg.into())
    }

    /// Build a [`CmsError::UndefinedTopographyObjectType`] value.
    pub fn undefined_type(tag: impl Into<String>) -> Self {
        Self::UndefinedTopographyObjectType(tag.into())
    }

    /// Build a [`CmsError::TopographyReconstruction`] value.
    pub fn topography_reconstruction(msg: impl Into<String>) -> Self {
        Self::TopographyReconstruction(msg.into())
    }

    /// Build a [`CmsError::InvalidSimulationStep`] value.
    pub fn invalid_step(msg: impl Into<String>) -> Self {
        Self::InvalidSimulationStep(msg.into())
    }

    /// Build a [`CmsError::SimulationReconstruction`] value.
    pub fn simulation_reconstruction(msg: impl Into<String>) -> Self {
        Self::SimulationReconstruction(msg.into())
    }

    /// Build a [`CmsError::InvalidQuery`] value.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Build a [`CmsError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTopographyObject(_) => ErrorKind::GeometryViolation,
            Self::DuplicateTopographyObjectId(_) => ErrorKind::DuplicateIdentity,
            Self::UndefinedTopographyObjectType(_) => ErrorKind::UnknownDiscriminant,
            Self::TopographyReconstruction(_) | Self::SimulationReconstruction(_) => {
                ErrorKind::MalformedInput
            }
            Self::InvalidSimulationStep(_) => ErrorKind::StepContentMismatch,
            Self::SimulationFull { .. } => ErrorKind::CapacityExceeded,
            Self::InvalidQuery(_) => ErrorKind::InvalidQuery,
            Self::Serde(_) => ErrorKind::Serialization,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
