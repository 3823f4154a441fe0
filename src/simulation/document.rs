use crate::foundation::core::{PedestrianId, Position};
use crate::foundation::error::{CmsError, CmsResult};
use crate::simulation::model::{Pedestrian, Simulation, SimulationStep};
use crate::topography::model::Topography;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PedestrianPositionDef {
    id: PedestrianId,
    position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimulationStepDef {
    #[serde(default)]
    step: Option<usize>,
    pedestrian_positions: Vec<PedestrianPositionDef>,
}

#[derive(Debug, Serialize)]
struct SimulationDocRef<'a> {
    pedestrians: &'a [Pedestrian],
    n_steps: usize,
    topography: Value,
    simulation_steps: Vec<SimulationStepDef>,
}

impl Simulation {
    /// Parse a simulation document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CmsResult<Self> {
        let value: Value = serde_json::from_reader(r)
            .map_err(|e| CmsError::serde(format!("parse simulation JSON: {e}")))?;
        Self::from_document(&value)
    }

    /// Load a simulation document from a JSON file on disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> CmsResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open simulation JSON '{}'", path.display()))?;
        let simulation = Self::from_reader(BufReader::new(f))?;
        tracing::info!(
            pedestrians = simulation.pedestrians().len(),
            steps = simulation.len(),
            n_steps = simulation.n_steps(),
            "loaded simulation"
        );
        Ok(simulation)
    }

    /// Reconstruct a simulation from an already parsed document.
    ///
    /// `pedestrians`, `n_steps`, `topography` and `simulation_steps` are required. The embedded
    /// topography's own reconstruction errors are returned as they are. Every step entry is
    /// converted to a [`SimulationStep`] and appended through [`Simulation::add_step`].
    pub fn from_document(value: &Value) -> CmsResult<Self> {
        let Value::Object(map) = value else {
            return Err(CmsError::simulation_reconstruction(
                "simulation document must be a JSON object",
            ));
        };

        let pedestrians = required(map, "pedestrians")?;
        let n_steps = required(map, "n_steps")?;
        let simulation_steps = required(map, "simulation_steps")?;
        let topography = required(map, "topography")?;

        let topography = Topography::from_representation(topography)?;

        let pedestrians: Vec<Pedestrian> = serde_json::from_value(pedestrians.clone())
            .map_err(|e| {
                CmsError::simulation_reconstruction(format!("malformed 'pedestrians': {e}"))
            })?;

        let n_steps = n_steps
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                CmsError::simulation_reconstruction(format!(
                    "'n_steps' must be a non-negative integer, got {n_steps}"
                ))
            })?;

        let step_defs: Vec<SimulationStepDef> = serde_json::from_value(simulation_steps.clone())
            .map_err(|e| {
                CmsError::simulation_reconstruction(format!("malformed 'simulation_steps': {e}"))
            })?;

        let mut simulation = Simulation::new(topography, pedestrians, n_steps);
        for (index, def) in step_defs.into_iter().enumerate() {
            simulation.add_step(step_from_def(index, def)?)?;
        }
        Ok(simulation)
    }

    /// Document form accepted by [`Simulation::from_document`].
    pub fn to_document(&self) -> CmsResult<Value> {
        serde_json::to_value(self.doc_ref()?)
            .map_err(|e| CmsError::serde(format!("encode simulation document: {e}")))
    }

    /// Write the document as pretty-printed JSON.
    ///
    /// Fails with [`CmsError::Serde`] before writing anything if a pedestrian radius is not
    /// finite, since JSON has no encoding for it.
    pub fn to_writer<W: std::io::Write>(&self, w: W) -> CmsResult<()> {
        let doc = self.doc_ref()?;
        serde_json::to_writer_pretty(w, &doc)
            .map_err(|e| CmsError::serde(format!("write simulation JSON: {e}")))
    }

    /// Save the document to a JSON file, replacing any existing file.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> CmsResult<()> {
        let path = path.as_ref();
        let doc = self.doc_ref()?;
        let f = File::create(path)
            .with_context(|| format!("create simulation JSON '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, &doc)
            .map_err(|e| CmsError::serde(format!("write simulation JSON: {e}")))?;
        w.flush()
            .with_context(|| format!("flush simulation JSON '{}'", path.display()))?;
        tracing::info!(steps = self.len(), "saved simulation");
        Ok(())
    }

    fn doc_ref(&self) -> CmsResult<SimulationDocRef<'_>> {
        if let Some(p) = self.pedestrians().iter().find(|p| !p.radius.is_finite()) {
            return Err(CmsError::serde(format!(
                "pedestrian {} radius must be finite, got {}",
                p.id, p.radius
            )));
        }
        Ok(SimulationDocRef {
            pedestrians: self.pedestrians(),
            n_steps: self.n_steps(),
            topography: self.topography().to_representation(),
            simulation_steps: self
                .steps()
                .iter()
                .enumerate()
                .map(|(index, step)| SimulationStepDef {
                    step: Some(index),
                    pedestrian_positions: step
                        .iter()
                        .map(|(&id, &position)| PedestrianPositionDef { id, position })
                        .collect(),
                })
                .collect(),
        })
    }
}

fn required<'a>(map: &'a Map<String, Value>, key: &str) -> CmsResult<&'a Value> {
    map.get(key).ok_or_else(|| {
        CmsError::simulation_reconstruction(format!("simulation document must include '{key}'"))
    })
}

fn step_from_def(index: usize, def: SimulationStepDef) -> CmsResult<SimulationStep> {
    match def.step {
        Some(declared) if declared != index => {
            return Err(CmsError::simulation_reconstruction(format!(
                "simulation_steps[{index}] declares step {declared}"
            )));
        }
        _ => {}
    }

    let mut step = SimulationStep::new();
    for entry in def.pedestrian_positions {
        if step.insert(entry.id, entry.position).is_some() {
            return Err(CmsError::simulation_reconstruction(format!(
                "simulation_steps[{index}] lists pedestrian {} more than once",
                entry.id
            )));
        }
    }
    Ok(step)
}

#[cfg(test)]
#[path = "../../tests/unit/simulation/document.rs"]
mod tests;
