use crate::foundation::core::{PedestrianId, Position};
use crate::foundation::error::{CmsError, CmsResult};
use crate::topography::model::Topography;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A participant of a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pedestrian {
    /// Identity. Unique by convention; the model does not enforce it.
    pub id: PedestrianId,
    /// Footprint radius used by renderers.
    pub radius: f64,
    /// Optional display label.
    #[serde(default)]
    pub label: Option<String>,
}

impl Pedestrian {
    pub fn new(id: PedestrianId, radius: f64, label: Option<String>) -> Self {
        Self { id, radius, label }
    }
}

/// Positions of pedestrians at one discrete tick, keyed by pedestrian id.
pub type SimulationStep = BTreeMap<PedestrianId, Position>;

/// A topography, a fixed pedestrian roster and an append-only history of steps.
///
/// The history never grows past `n_steps`. Every step, including the ones passed at
/// construction, goes through [`Simulation::add_step`].
#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    topography: Topography,
    pedestrians: Vec<Pedestrian>,
    roster_ids: BTreeSet<PedestrianId>,
    n_steps: usize,
    simulation_steps: Vec<SimulationStep>,
}

impl Simulation {
    /// Create a simulation with an empty history.
    pub fn new(topography: Topography, pedestrians: Vec<Pedestrian>, n_steps: usize) -> Self {
        let roster_ids = pedestrians.iter().map(|p| p.id).collect();
        Self {
            topography,
            pedestrians,
            roster_ids,
            n_steps,
            simulation_steps: Vec::new(),
        }
    }

    /// Create a simulation and append `initial_steps` one by one.
    pub fn with_steps<I>(
        topography: Topography,
        pedestrians: Vec<Pedestrian>,
        n_steps: usize,
        initial_steps: I,
    ) -> CmsResult<Self>
    where
        I: IntoIterator<Item = SimulationStep>,
    {
        let mut simulation = Self::new(topography, pedestrians, n_steps);
        simulation.extend_steps(initial_steps)?;
        Ok(simulation)
    }

    pub fn topography(&self) -> &Topography {
        &self.topography
    }

    pub fn pedestrians(&self) -> &[Pedestrian] {
        &self.pedestrians
    }

    /// First roster entry with the given id.
    pub fn pedestrian(&self, id: PedestrianId) -> Option<&Pedestrian> {
        self.pedestrians.iter().find(|p| p.id == id)
    }

    /// Capacity of the step history.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn steps(&self) -> &[SimulationStep] {
        &self.simulation_steps
    }

    pub fn step(&self, index: usize) -> Option<&SimulationStep> {
        self.simulation_steps.get(index)
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.simulation_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulation_steps.is_empty()
    }

    /// Return `true` once all `n_steps` steps are recorded.
    pub fn is_complete(&self) -> bool {
        self.simulation_steps.len() == self.n_steps
    }

    /// Number of steps that can still be appended.
    pub fn remaining_steps(&self) -> usize {
        self.n_steps.saturating_sub(self.simulation_steps.len())
    }

    /// Append one step.
    ///
    /// Fails with [`CmsError::SimulationFull`] once the history holds `n_steps` steps, and with
    /// [`CmsError::InvalidSimulationStep`] if a roster pedestrian has no position or a position
    /// outside the topography. Ids that are not in the roster are kept but not checked.
    pub fn add_step(&mut self, step: SimulationStep) -> CmsResult<()> {
        if self.is_complete() {
            return Err(CmsError::SimulationFull {
                n_steps: self.n_steps,
            });
        }
        self.validate_step(&step)?;

        let extra = step
            .keys()
            .filter(|id| !self.roster_ids.contains(*id))
            .count();
        if extra > 0 {
            tracing::warn!(
                step = self.simulation_steps.len(),
                extra,
                "step carries positions for pedestrians outside the roster"
            );
        }

        tracing::debug!(step = self.simulation_steps.len(), "added simulation step");
        self.simulation_steps.push(step);
        Ok(())
    }

    /// Append several steps through [`Simulation::add_step`].
    ///
    /// Steps before a failing one stay recorded.
    pub fn extend_steps<I>(&mut self, steps: I) -> CmsResult<()>
    where
        I: IntoIterator<Item = SimulationStep>,
    {
        for step in steps {
            self.add_step(step)?;
        }
        Ok(())
    }

    fn validate_step(&self, step: &SimulationStep) -> CmsResult<()> {
        let index = self.simulation_steps.len();
        for pedestrian in &self.pedestrians {
            let Some(&pos) = step.get(&pedestrian.id) else {
                return Err(CmsError::invalid_step(format!(
                    "step {index} has no position for pedestrian {}",
                    pedestrian.id
                )));
            };
            if !self.topography.contains_position(pos) {
                return Err(CmsError::invalid_step(format!(
                    "step {index} places pedestrian {} at {pos}, outside the {}x{} topography",
                    pedestrian.id,
                    self.topography.width(),
                    self.topography.height()
                )));
            }
        }
        Ok(())
    }

    /// Position of `id` at step `index`, if both exist.
    pub fn position(&self, index: usize, id: PedestrianId) -> Option<Position> {
        self.step(index).and_then(|step| step.get(&id).copied())
    }

    /// Positions of a roster pedestrian from step 0 through `until_step`, inclusive.
    pub fn trajectory(&self, id: PedestrianId, until_step: usize) -> CmsResult<Vec<Position>> {
        if !self.roster_ids.contains(&id) {
            return Err(CmsError::invalid_query(format!(
                "pedestrian {id} is not in the roster"
            )));
        }
        if until_step >= self.simulation_steps.len() {
            return Err(CmsError::invalid_query(format!(
                "step {until_step} is not recorded ({} steps available)",
                self.simulation_steps.len()
            )));
        }
        // Roster pedestrians are present in every accepted step.
        Ok(self.simulation_steps[..=until_step]
            .iter()
            .filter_map(|step| step.get(&id).copied())
            .collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/simulation/model.rs"]
mod tests;
