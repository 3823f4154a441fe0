use crate::foundation::core::{ObjectId, Rect};
use crate::foundation::error::{CmsError, CmsResult};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Key carrying the object discriminant in the dictionary representation.
pub(crate) const TYPE_KEY: &str = "type";

/// Discriminant of a topography object shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// Axis-aligned rectangle anchored at its minimum corner.
    Rectangular,
}

impl ObjectType {
    /// Tag written to and read from the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangular => "RECTANGULAR",
        }
    }

    /// Resolve a `type` tag.
    pub fn parse(tag: &str) -> CmsResult<Self> {
        match tag {
            "RECTANGULAR" => Ok(Self::Rectangular),
            other => Err(CmsError::undefined_type(other)),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape-specific part of a [`TopographyObject`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TopographyObjectKind {
    /// Rectangle spanning `[x, x + width) x [y, y + height)`.
    Rectangular {
        /// Horizontal extent.
        width: i64,
        /// Vertical extent.
        height: i64,
    },
}

/// Which collection of a topography an object belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRole {
    /// Pedestrian spawn area.
    Source,
    /// Pedestrian destination.
    Target,
    /// Impassable area.
    Obstacle,
}

impl ObjectRole {
    /// All roles in reconstruction order.
    pub const ALL: [ObjectRole; 3] = [Self::Source, Self::Target, Self::Obstacle];

    /// Key of the role's list in the dictionary representation.
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Source => "sources",
            Self::Target => "targets",
            Self::Obstacle => "obstacles",
        }
    }
}

impl fmt::Display for ObjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Target => "target",
            Self::Obstacle => "obstacle",
        })
    }
}

/// A source, target or obstacle placed in a topography.
///
/// The role is not part of the object; it is decided by the collection the object is added to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TopographyObject {
    /// Identity, unique across all collections of one topography.
    pub id: ObjectId,
    /// Anchor x coordinate.
    pub x: i64,
    /// Anchor y coordinate.
    pub y: i64,
    /// Shape.
    pub kind: TopographyObjectKind,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct RectangularDef {
    id: ObjectId,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

impl TopographyObject {
    /// Create a rectangular object.
    pub const fn rectangular(id: ObjectId, x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            id,
            x,
            y,
            kind: TopographyObjectKind::Rectangular { width, height },
        }
    }

    /// Discriminant of this object's shape.
    pub fn object_type(&self) -> ObjectType {
        match self.kind {
            TopographyObjectKind::Rectangular { .. } => ObjectType::Rectangular,
        }
    }

    /// Minimum corner `(x, y)`.
    pub fn min_coordinates(&self) -> (i64, i64) {
        match self.kind {
            TopographyObjectKind::Rectangular { .. } => (self.x, self.y),
        }
    }

    /// Maximum corner. Saturates instead of overflowing.
    pub fn max_coordinates(&self) -> (i64, i64) {
        match self.kind {
            TopographyObjectKind::Rectangular { width, height } => (
                self.x.saturating_add(width),
                self.y.saturating_add(height),
            ),
        }
    }

    /// Return `true` when the object has nonzero extent and lies strictly inside
    /// `[0,width) x [0,height)`, including its maximum corner.
    pub fn fits_within(&self, width: i64, height: i64) -> bool {
        let (min_x, min_y) = self.min_coordinates();
        let (max_x, max_y) = self.max_coordinates();

        0 <= min_x
            && min_x < max_x
            && max_x < width
            && 0 <= min_y
            && min_y < max_y
            && max_y < height
    }

    /// Bounding rectangle for rendering consumers.
    ///
    /// Corners are exact while coordinates stay within `±2^53`; beyond that they round to the
    /// nearest representable `f64`.
    pub fn rect(&self) -> Rect {
        let (min_x, min_y) = self.min_coordinates();
        let (max_x, max_y) = self.max_coordinates();
        Rect::new(min_x as f64, min_y as f64, max_x as f64, max_y as f64)
    }

    /// Dictionary form: the object's fields plus its `type` tag.
    pub fn to_representation(&self) -> Value {
        match self.kind {
            TopographyObjectKind::Rectangular { width, height } => serde_json::json!({
                "id": self.id,
                "x": self.x,
                "y": self.y,
                "width": width,
                "height": height,
                "type": self.object_type().as_str(),
            }),
        }
    }

    /// Parse the dictionary form produced by [`TopographyObject::to_representation`].
    ///
    /// Only shape is checked here; containment and id uniqueness belong to the topography.
    pub fn from_representation(value: &Value) -> CmsResult<Self> {
        let Value::Object(map) = value else {
            return Err(CmsError::topography_reconstruction(format!(
                "topography object must be a JSON object, got {value}"
            )));
        };

        let tag = match map.get(TYPE_KEY) {
            Some(Value::String(tag)) => tag.as_str(),
            Some(other) => return Err(CmsError::undefined_type(other.to_string())),
            None => {
                return Err(CmsError::topography_reconstruction(format!(
                    "topography object must include '{TYPE_KEY}'"
                )));
            }
        };

        let mut fields = map.clone();
        fields.remove(TYPE_KEY);

        match ObjectType::parse(tag)? {
            ObjectType::Rectangular => {
                let def: RectangularDef =
                    serde_json::from_value(Value::Object(fields)).map_err(|e| {
                        CmsError::topography_reconstruction(format!(
                            "malformed {tag} object: {e}"
                        ))
                    })?;
                Ok(Self::rectangular(def.id, def.x, def.y, def.width, def.height))
            }
        }
    }
}

impl fmt::Display for TopographyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TopographyObjectKind::Rectangular { width, height } => write!(
                f,
                "RectangularTopographyObject(id={}, x={}, y={}, width={}, height={})",
                self.id, self.x, self.y, width, height
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/topography/object.rs"]
mod tests;
