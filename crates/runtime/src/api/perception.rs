//! Perception input and the per-tick snapshot.

use bot_core::{Position, RespawnSignal, ResourceNode, Timestamp};

/// Read side of the client.
///
/// Every method returns `None` when the client could not read that piece of
/// state this tick. Callers treat `None` as a benign no-data tick; an empty
/// `Some` means the read worked and found nothing.
pub trait PositionSource {
    fn self_position(&self) -> Option<Position>;

    /// Positions of the patrolling threats currently visible.
    fn threat_positions(&self) -> Option<Vec<Position>>;

    /// Resource nodes currently perceivable and interactable.
    fn candidate_nodes(&self) -> Option<Vec<ResourceNode>>;

    /// Locations showing a depleted/regenerating marker.
    fn respawn_signals(&self) -> Option<Vec<Position>>;

    /// Other players nearby.
    fn other_agents(&self) -> Option<Vec<Position>>;
}

/// Consistent view of the world captured once at the start of a tick.
///
/// Task predicates read this snapshot rather than the live source, so every
/// predicate in one tick sees the same threat and node data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Perception {
    pub tick: u64,
    pub at: Timestamp,
    pub self_position: Option<Position>,
    pub threats: Option<Vec<Position>>,
    pub candidates: Option<Vec<ResourceNode>>,
    pub respawn: Option<RespawnSignal>,
    pub other_agents: Option<Vec<Position>>,
}

impl Perception {
    pub fn capture(source: &dyn PositionSource, tick: u64, at: Timestamp) -> Self {
        Self {
            tick,
            at,
            self_position: source.self_position(),
            threats: source.threat_positions(),
            candidates: source.candidate_nodes(),
            respawn: source
                .respawn_signals()
                .map(|signals| signals.into_iter().collect()),
            other_agents: source.other_agents(),
        }
    }

    /// True when the agent is known to stand on `pos`.
    pub fn is_at(&self, pos: Position) -> bool {
        self.self_position == Some(pos)
    }

    pub fn threats_or_empty(&self) -> &[Position] {
        self.threats.as_deref().unwrap_or(&[])
    }

    pub fn other_agents_or_empty(&self) -> &[Position] {
        self.other_agents.as_deref().unwrap_or(&[])
    }

    /// Candidates usable for selection this tick.
    ///
    /// Without a readable respawn signal a depleted node cannot be told apart
    /// from a live one, so the whole candidate read counts as unavailable.
    pub fn selectable_candidates(&self) -> Option<&[ResourceNode]> {
        self.respawn.as_ref()?;
        self.candidates.as_deref()
    }
}
