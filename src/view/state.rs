use crate::foundation::core::{PedestrianId, Position};
use crate::foundation::error::{CmsError, CmsResult};
use crate::simulation::model::{Pedestrian, Simulation, SimulationStep};
use std::fmt;

/// Transient UI state of a simulation viewer: the displayed step and the highlighted pedestrian.
///
/// Holds the simulation by shared reference; nothing here can change recorded steps.
#[derive(Clone, Copy, Debug)]
pub struct ViewState<'a> {
    simulation: &'a Simulation,
    current_step: usize,
    highlighted: usize, // roster index
}

/// Summary of one pedestrian at the displayed step.
#[derive(Clone, Debug, PartialEq)]
pub struct PedestrianInfo {
    pub id: PedestrianId,
    pub position: Position,
    pub radius: f64,
    pub label: Option<String>,
}

impl fmt::Display for PedestrianInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "id: {}", self.id)?;
        if let Some(label) = &self.label {
            writeln!(f, "Label: {label}")?;
        }
        writeln!(f, "X: {}", self.position.x)?;
        writeln!(f, "Y: {}", self.position.y)?;
        write!(f, "Radius: {}", self.radius)
    }
}

impl<'a> ViewState<'a> {
    /// Start at step 0 with the first roster pedestrian highlighted.
    pub fn new(simulation: &'a Simulation) -> Self {
        Self {
            simulation,
            current_step: 0,
            highlighted: 0,
        }
    }

    pub fn simulation(&self) -> &'a Simulation {
        self.simulation
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn highlighted_index(&self) -> usize {
        self.highlighted
    }

    /// Display a recorded step.
    pub fn set_step(&mut self, index: usize) -> CmsResult<()> {
        if index >= self.simulation.len() {
            return Err(CmsError::invalid_query(format!(
                "step {index} is not recorded ({} steps available)",
                self.simulation.len()
            )));
        }
        self.current_step = index;
        Ok(())
    }

    /// Highlight the pedestrian at a roster index.
    pub fn highlight(&mut self, index: usize) -> CmsResult<()> {
        let roster = self.simulation.pedestrians().len();
        if index >= roster {
            return Err(CmsError::invalid_query(format!(
                "roster index {index} is out of range ({roster} pedestrians)"
            )));
        }
        self.highlighted = index;
        Ok(())
    }

    /// Highlight the first roster pedestrian with the given id.
    pub fn highlight_pedestrian(&mut self, id: PedestrianId) -> CmsResult<()> {
        let index = self
            .simulation
            .pedestrians()
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| {
                CmsError::invalid_query(format!("pedestrian {id} is not in the roster"))
            })?;
        self.highlighted = index;
        Ok(())
    }

    /// Positions at the displayed step, if any step is recorded.
    pub fn current_positions(&self) -> Option<&'a SimulationStep> {
        self.simulation.step(self.current_step)
    }

    pub fn highlighted_pedestrian(&self) -> Option<&'a Pedestrian> {
        self.simulation.pedestrians().get(self.highlighted)
    }

    /// Info box content for the highlighted pedestrian at the displayed step.
    pub fn pedestrian_info(&self) -> Option<PedestrianInfo> {
        let pedestrian = self.highlighted_pedestrian()?;
        let position = self.simulation.position(self.current_step, pedestrian.id)?;
        Some(PedestrianInfo {
            id: pedestrian.id,
            position,
            radius: pedestrian.radius,
            label: pedestrian.label.clone(),
        })
    }

    /// Path of the highlighted pedestrian from step 0 through the displayed step.
    pub fn trail(&self) -> CmsResult<Vec<Position>> {
        let pedestrian = self
            .highlighted_pedestrian()
            .ok_or_else(|| CmsError::invalid_query("roster is empty"))?;
        self.simulation.trajectory(pedestrian.id, self.current_step)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/state.rs"]
mod tests;
