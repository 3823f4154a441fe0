//! `cms-model` is the validated data model behind a crowd-simulation viewer.
//!
//! It holds two things:
//!
//! - A [`Topography`]: a fixed-size area with rectangular sources, targets and obstacles that
//!   must fit strictly inside it and carry ids unique across all three collections.
//! - A [`Simulation`]: a topography, a pedestrian roster and an append-only, capacity-bounded
//!   history of steps, loaded from and saved to a single JSON document.
//!
//! Pedestrian movement is never computed here; trajectories come from elsewhere and are only
//! validated and recorded. Renderers read the model and keep their own [`ViewState`].
#![forbid(unsafe_code)]

mod foundation;
mod simulation;
mod topography;
mod view;

pub use crate::foundation::core::{ObjectId, PedestrianId, Position, Rect};
pub use crate::foundation::error::{CmsError, CmsResult, ErrorKind};
pub use crate::simulation::model::{Pedestrian, Simulation, SimulationStep};
pub use crate::topography::model::Topography;
pub use crate::topography::object::{
    ObjectRole, ObjectType, TopographyObject, TopographyObjectKind,
};
pub use crate::view::state::{PedestrianInfo, ViewState};
