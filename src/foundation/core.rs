use serde::{Deserialize, Serialize};
use std::fmt;

pub use kurbo::Rect;

/// Identity of a source, target or obstacle, unique within one topography.
pub type ObjectId = i64;

/// Identity of a pedestrian in a simulation roster.
pub type PedestrianId = i64;

/// Integer grid coordinate of a pedestrian.
///
/// Serialized as a two-element array `[x, y]`; deserialization also accepts `{"x": .., "y": ..}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Return `true` when the position lies in the half-open area `[0,width) x [0,height)`.
    pub fn is_within(self, width: i64, height: i64) -> bool {
        0 <= self.x && self.x < width && 0 <= self.y && self.y < height
    }
}

impl From<(i64, i64)> for Position {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        [self.x, self.y].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([i64; 2]),
            Obj { x: i64, y: i64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
