//! Resource nodes and respawn markers as seen by perception.

use std::collections::HashSet;
use std::fmt;

use crate::geometry::Position;

/// Identifier assigned to a node by the perception layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An interactable resource node (rock, stall, tree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceNode {
    pub id: NodeId,
    pub position: Position,
}

impl ResourceNode {
    pub const fn new(id: u32, position: Position) -> Self {
        Self {
            id: NodeId(id),
            position,
        }
    }
}

/// Locations currently showing a depleted/regenerating marker.
///
/// Rebuilt from perception every tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RespawnSignal {
    locations: HashSet<Position>,
}

impl RespawnSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, location: Position) -> bool {
        self.locations.contains(&location)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.locations.iter()
    }
}

impl FromIterator<Position> for RespawnSignal {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            locations: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a Position> for RespawnSignal {
    fn from_iter<I: IntoIterator<Item = &'a Position>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}
