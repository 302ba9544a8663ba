//! Network node.

use serde::{Deserialize, Serialize};

/// Unique node id.
pub type NodeId = usize;

/// Location of a node in the modeled area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Position along the x axis in meters.
    pub x: f64,
    /// Position along the y axis in meters.
    pub y: f64,
    /// Position along the z axis in meters.
    #[serde(default)]
    pub z: f64,
}

impl Position {
    /// Creates a position from its coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2) + (other.z - self.z).powi(2)).sqrt()
    }
}

/// A node in the network.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node id.
    pub id: NodeId,
    /// Node position, used to derive direct-link distances.
    pub position: Position,
}
