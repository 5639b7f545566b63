//! Scenario description for the simulated environment.
//!
//! A scenario places the agent, the patrolling guards, the resource nodes and
//! other miners. Everything in it is static data; the runtime's simulation
//! derives all dynamic state from it plus the simulated clock.

use bot_core::{Area, Position, ResourceNode};
use serde::{Deserialize, Serialize};

fn default_action_ms() -> u64 {
    1_800
}

fn default_tile_ms() -> u64 {
    600
}

fn default_worlds() -> u32 {
    2
}

/// Guard walking a fixed route, one route cell per step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardRoute {
    pub name: String,
    /// Cells visited in order; the route loops back to the first cell.
    pub route: Vec<Position>,
    pub step_ms: u64,
    /// Shifts the guard along its route at time zero.
    #[serde(default)]
    pub offset_ms: u64,
}

impl GuardRoute {
    /// Cell occupied at `time_ms`.
    pub fn position_at(&self, time_ms: u64) -> Option<Position> {
        if self.route.is_empty() || self.step_ms == 0 {
            return None;
        }
        let step = (time_ms.saturating_add(self.offset_ms) / self.step_ms) as usize;
        self.route.get(step % self.route.len()).copied()
    }
}

/// A minable node that depletes when worked and respawns later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RockSpec {
    /// Allocated sequentially when omitted.
    #[serde(default)]
    pub id: Option<u32>,
    pub position: Position,
    pub respawn_ms: u64,
}

/// Another player standing on a tile in one world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerSpec {
    pub position: Position,
    #[serde(default)]
    pub world: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    pub agent_start: Position,
    #[serde(default)]
    pub guards: Vec<GuardRoute>,
    #[serde(default)]
    pub rocks: Vec<RockSpec>,
    #[serde(default)]
    pub miners: Vec<MinerSpec>,
    /// Number of worlds a relocation cycles through.
    #[serde(default = "default_worlds")]
    pub worlds: u32,
    /// Simulated duration of one interaction.
    #[serde(default = "default_action_ms")]
    pub action_ms: u64,
    /// Simulated walking time per tile.
    #[serde(default = "default_tile_ms")]
    pub tile_ms: u64,
    /// Area whose contents count as visible. Everything is visible when unset.
    #[serde(default)]
    pub view: Option<Area>,
}

impl ScenarioSpec {
    /// Resource nodes with ids resolved.
    ///
    /// Explicit ids are kept; missing ones take the next id after the highest
    /// explicit id, in declaration order.
    pub fn nodes(&self) -> Vec<(ResourceNode, u64)> {
        let mut next = self
            .rocks
            .iter()
            .filter_map(|rock| rock.id)
            .max()
            .map_or(0, |max| max + 1);

        self.rocks
            .iter()
            .map(|rock| {
                let id = rock.id.unwrap_or_else(|| {
                    let id = next;
                    next += 1;
                    id
                });
                (ResourceNode::new(id, rock.position), rock.respawn_ms)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_loops_over_route() {
        let guard = GuardRoute {
            name: "g".into(),
            route: vec![Position::ground(0, 0), Position::ground(1, 0)],
            step_ms: 1_000,
            offset_ms: 0,
        };
        assert_eq!(guard.position_at(0), Some(Position::ground(0, 0)));
        assert_eq!(guard.position_at(1_500), Some(Position::ground(1, 0)));
        assert_eq!(guard.position_at(2_000), Some(Position::ground(0, 0)));
    }

    #[test]
    fn node_ids_fill_gaps_after_explicit_ones() {
        let rock = |id, x| RockSpec {
            id,
            position: Position::ground(x, 0),
            respawn_ms: 1_000,
        };
        let spec = ScenarioSpec {
            name: "ids".into(),
            agent_start: Position::ground(0, 0),
            guards: vec![],
            rocks: vec![rock(None, 1), rock(Some(7), 2), rock(None, 3)],
            miners: vec![],
            worlds: 2,
            action_ms: 600,
            tile_ms: 600,
            view: None,
        };
        let ids: Vec<u32> = spec.nodes().iter().map(|(node, _)| node.id.0).collect();
        assert_eq!(ids, vec![8, 7, 9]);
    }
}
