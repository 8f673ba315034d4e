//! World-facing seams the host implements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block position in a named world.
/// Implements Ord for deterministic iteration in BTreeMap (sorts by world, then x, y, z).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockLocation {
    /// World name.
    pub world: String,
    /// Block X.
    pub x: i32,
    /// Block Y.
    pub y: i32,
    /// Block Z.
    pub z: i32,
}

impl BlockLocation {
    /// Create a location.
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

impl fmt::Display for BlockLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}

/// Block mutation primitive provided by the host world.
pub trait BlockHost {
    /// Change the visible block type at `location`. `update` asks the host to
    /// propagate neighbour/physics updates; batched edits pass `false` and
    /// update once at the end.
    fn set_block(&mut self, location: &BlockLocation, material: &str, update: bool);
}
