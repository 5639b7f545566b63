//! Picking the next resource node to work.
//!
//! Candidates are filtered and ranked in one pass:
//!
//! 1. nodes under a respawn marker are dropped outright;
//! 2. the rest are tiered by blacklist and occupancy state;
//! 3. within a tier, nodes are ordered by distance from the previous target
//!    hint if one is set, else from the agent.
//!
//! Nodes both blacklisted and occupied by another agent ([`CandidateTier::Contested`])
//! are only returned when nothing better remains, so the agent keeps working
//! instead of stalling.

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::blacklist::ResourceBlacklist;
use crate::geometry::Position;
use crate::resource::{RespawnSignal, ResourceNode};
use crate::time::Timestamp;

/// Desirability of a candidate, best first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateTier {
    /// Not blacklisted, nobody nearby.
    Free,
    /// Blacklisted by our own earlier claim; nobody else is on it.
    ClaimedByUs,
    /// Another agent is on or next to it; no live claim.
    Occupied,
    /// Live claim and another agent is working it.
    Contested,
}

impl fmt::Display for CandidateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Free => "free",
            Self::ClaimedByUs => "claimed-by-us",
            Self::Occupied => "occupied",
            Self::Contested => "contested",
        };
        f.write_str(label)
    }
}

/// Outcome of a selection pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Target {
        node: ResourceNode,
        tier: CandidateTier,
    },
    /// Perception worked but there is nothing to work here.
    Relocate,
    /// Perception returned no data this tick.
    Unavailable,
}

impl Selection {
    pub fn node(&self) -> Option<ResourceNode> {
        match self {
            Self::Target { node, .. } => Some(*node),
            _ => None,
        }
    }
}

/// Per-tick view the selector works on.
#[derive(Clone, Copy, Debug)]
pub struct SelectionInput<'a> {
    /// `None` when perception failed this tick.
    pub candidates: Option<&'a [ResourceNode]>,
    pub respawn: &'a RespawnSignal,
    pub other_agents: &'a [Position],
    pub agent: Option<Position>,
    /// Location of the previous target, for continuity.
    pub hint: Option<Position>,
}

#[derive(Clone, Copy, Debug)]
struct Ranked {
    node: ResourceNode,
    tier: CandidateTier,
    distance: f64,
    claimed_at: Option<Timestamp>,
}

/// Stateless ranking of candidate nodes.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetSelector;

impl TargetSelector {
    pub fn new() -> Self {
        Self
    }

    /// True if another agent stands on or next to `node` on the same plane.
    pub fn is_occupied(node: Position, other_agents: &[Position]) -> bool {
        other_agents.iter().any(|agent| agent.is_adjacent_or_on(node))
    }

    pub fn tier_of(
        node: Position,
        blacklist: &ResourceBlacklist,
        other_agents: &[Position],
        now: Timestamp,
    ) -> CandidateTier {
        let claimed = !blacklist.is_available(node, now);
        let occupied = Self::is_occupied(node, other_agents);
        match (claimed, occupied) {
            (false, false) => CandidateTier::Free,
            (true, false) => CandidateTier::ClaimedByUs,
            (false, true) => CandidateTier::Occupied,
            (true, true) => CandidateTier::Contested,
        }
    }

    pub fn select(
        &self,
        input: SelectionInput<'_>,
        blacklist: &ResourceBlacklist,
        now: Timestamp,
    ) -> Selection {
        let Some(candidates) = input.candidates else {
            debug!("no perception data, skipping selection");
            return Selection::Unavailable;
        };

        let origin = input.hint.or(input.agent);
        let ranked: Vec<Ranked> = candidates
            .iter()
            .filter(|node| !input.respawn.contains(node.position))
            .map(|node| Ranked {
                node: *node,
                tier: Self::tier_of(node.position, blacklist, input.other_agents, now),
                distance: origin.map_or(0.0, |o| o.distance_to(node.position)),
                claimed_at: blacklist.claimed_at(node.position, now),
            })
            .collect();

        if ranked.is_empty() {
            debug!(
                seen = candidates.len(),
                respawning = input.respawn.len(),
                "no usable candidates, relocate"
            );
            return Selection::Relocate;
        }

        let best = ranked
            .iter()
            .filter(|r| r.tier != CandidateTier::Contested)
            .min_by(|a, b| {
                a.tier
                    .cmp(&b.tier)
                    .then_with(|| by_distance(a, b))
                    .then_with(|| a.node.id.cmp(&b.node.id))
            });

        let chosen = match best {
            Some(best) => best,
            None => {
                // Everything is contested: take the claim most likely to be done
                let Some(fallback) = ranked.iter().min_by(|a, b| {
                    a.claimed_at
                        .cmp(&b.claimed_at)
                        .then_with(|| by_distance(a, b))
                        .then_with(|| a.node.id.cmp(&b.node.id))
                }) else {
                    return Selection::Relocate;
                };
                debug!(node = %fallback.node.id, "all candidates contested, proceeding anyway");
                fallback
            }
        };

        debug!(
            node = %chosen.node.id,
            position = %chosen.node.position,
            tier = %chosen.tier,
            distance = chosen.distance,
            "selected target"
        );
        Selection::Target {
            node: chosen.node,
            tier: chosen.tier,
        }
    }
}

fn by_distance(a: &Ranked, b: &Ranked) -> Ordering {
    a.distance.total_cmp(&b.distance)
}
