use crate::foundation::core::{ObjectId, Position, Rect};
use crate::foundation::error::{CmsError, CmsResult};
use crate::topography::object::{ObjectRole, TopographyObject};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A fixed-size area `[0,width) x [0,height)` holding sources, targets and obstacles.
///
/// Objects are only ever appended. Every add operation checks geometry first and id uniqueness
/// second; objects accepted before a failing one stay in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topography {
    width: i64,
    height: i64,
    sources: Vec<TopographyObject>,
    targets: Vec<TopographyObject>,
    obstacles: Vec<TopographyObject>,
    object_ids: BTreeSet<ObjectId>, // across all three collections
}

impl Topography {
    /// Create an empty topography.
    ///
    /// Non-positive dimensions are accepted, but no object can ever fit into such an area.
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            sources: Vec::new(),
            targets: Vec::new(),
            obstacles: Vec::new(),
            object_ids: BTreeSet::new(),
        }
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn sources(&self) -> &[TopographyObject] {
        &self.sources
    }

    pub fn targets(&self) -> &[TopographyObject] {
        &self.targets
    }

    pub fn obstacles(&self) -> &[TopographyObject] {
        &self.obstacles
    }

    /// Objects stored under `role`.
    pub fn collection(&self, role: ObjectRole) -> &[TopographyObject] {
        match role {
            ObjectRole::Source => &self.sources,
            ObjectRole::Target => &self.targets,
            ObjectRole::Obstacle => &self.obstacles,
        }
    }

    /// Ids registered across all collections.
    pub fn object_ids(&self) -> &BTreeSet<ObjectId> {
        &self.object_ids
    }

    pub fn contains_id(&self, id: ObjectId) -> bool {
        self.object_ids.contains(&id)
    }

    /// Total number of objects across all collections.
    pub fn object_count(&self) -> usize {
        self.object_ids.len()
    }

    /// All objects with their role, sources first, then targets, then obstacles.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectRole, &TopographyObject)> + '_ {
        ObjectRole::ALL
            .into_iter()
            .flat_map(move |role| self.collection(role).iter().map(move |obj| (role, obj)))
    }

    /// Look an object up by id.
    pub fn object(&self, id: ObjectId) -> Option<(ObjectRole, &TopographyObject)> {
        if !self.contains_id(id) {
            return None;
        }
        self.objects().find(|(_, obj)| obj.id == id)
    }

    /// Outer bounds of the area. Exact for dimensions up to `2^53`, rounded above.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// Return `true` when `pos` lies inside `[0,width) x [0,height)`.
    pub fn contains_position(&self, pos: Position) -> bool {
        pos.is_within(self.width, self.height)
    }

    /// Return `true` when `obj` fits strictly inside this topography with nonzero extent.
    pub fn is_valid_object(&self, obj: &TopographyObject) -> bool {
        obj.fits_within(self.width, self.height)
    }

    /// Append sources. See [`Topography::add_objects`].
    pub fn add_sources<I>(&mut self, objects: I) -> CmsResult<&mut Self>
    where
        I: IntoIterator<Item = TopographyObject>,
    {
        self.add_objects(ObjectRole::Source, objects)
    }

    /// Append targets. See [`Topography::add_objects`].
    pub fn add_targets<I>(&mut self, objects: I) -> CmsResult<&mut Self>
    where
        I: IntoIterator<Item = TopographyObject>,
    {
        self.add_objects(ObjectRole::Target, objects)
    }

    /// Append obstacles. See [`Topography::add_objects`].
    pub fn add_obstacles<I>(&mut self, objects: I) -> CmsResult<&mut Self>
    where
        I: IntoIterator<Item = TopographyObject>,
    {
        self.add_objects(ObjectRole::Obstacle, objects)
    }

    /// Append `objects` to the collection for `role`, in order.
    ///
    /// Fails with [`CmsError::InvalidTopographyObject`] if an object does not fit and with
    /// [`CmsError::DuplicateTopographyObjectId`] if its id is already registered in any
    /// collection. There is no rollback: objects before the failing one remain added.
    pub fn add_objects<I>(&mut self, role: ObjectRole, objects: I) -> CmsResult<&mut Self>
    where
        I: IntoIterator<Item = TopographyObject>,
    {
        for obj in objects {
            if !self.is_valid_object(&obj) {
                return Err(CmsError::invalid_object(format!(
                    "{obj} is invalid for a {}x{} topography ({role})",
                    self.width, self.height
                )));
            }
            if !self.object_ids.insert(obj.id) {
                return Err(CmsError::DuplicateTopographyObjectId(obj.id));
            }
            tracing::debug!(%role, id = obj.id, "added topography object");
            match role {
                ObjectRole::Source => self.sources.push(obj),
                ObjectRole::Target => self.targets.push(obj),
                ObjectRole::Obstacle => self.obstacles.push(obj),
            }
        }
        Ok(self)
    }

    /// Reconstruct a topography from its dictionary form.
    ///
    /// Required keys are `sources`, `targets`, `obstacles`, `width` and `height`. Objects are
    /// parsed collection by collection and then added through the regular add operations, so
    /// geometry and id checks apply exactly as for hand-built topographies.
    #[tracing::instrument(skip_all)]
    pub fn from_representation(value: &Value) -> CmsResult<Self> {
        let Value::Object(map) = value else {
            return Err(CmsError::topography_reconstruction(
                "topography must be a JSON object",
            ));
        };

        let sources = parse_collection(map, ObjectRole::Source)?;
        let targets = parse_collection(map, ObjectRole::Target)?;
        let obstacles = parse_collection(map, ObjectRole::Obstacle)?;
        let width = parse_dimension(map, "width")?;
        let height = parse_dimension(map, "height")?;

        let mut topography = Self::new(width, height);
        topography
            .add_sources(sources)?
            .add_targets(targets)?
            .add_obstacles(obstacles)?;
        Ok(topography)
    }

    /// Dictionary form accepted by [`Topography::from_representation`].
    pub fn to_representation(&self) -> Value {
        let mut map = Map::new();
        map.insert("width".to_string(), Value::from(self.width));
        map.insert("height".to_string(), Value::from(self.height));
        for role in ObjectRole::ALL {
            let list = self
                .collection(role)
                .iter()
                .map(TopographyObject::to_representation)
                .collect();
            map.insert(role.collection_key().to_string(), Value::Array(list));
        }
        Value::Object(map)
    }
}

fn parse_collection(
    map: &Map<String, Value>,
    role: ObjectRole,
) -> CmsResult<Vec<TopographyObject>> {
    let key = role.collection_key();
    let Some(value) = map.get(key) else {
        return Err(CmsError::topography_reconstruction(format!(
            "object must include '{key}'"
        )));
    };
    let Value::Array(items) = value else {
        return Err(CmsError::topography_reconstruction(format!(
            "'{key}' must be a list"
        )));
    };
    items
        .iter()
        .map(TopographyObject::from_representation)
        .collect()
}

fn parse_dimension(map: &Map<String, Value>, key: &str) -> CmsResult<i64> {
    let Some(value) = map.get(key) else {
        return Err(CmsError::topography_reconstruction(format!(
            "object must include '{key}'"
        )));
    };
    value.as_i64().ok_or_else(|| {
        CmsError::topography_reconstruction(format!("'{key}' must be an integer, got {value}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/topography/model.rs"]
mod tests;
