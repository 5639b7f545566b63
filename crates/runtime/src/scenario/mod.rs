//! Deterministic simulated client.
//!
//! [`SimWorld`] implements [`Environment`](crate::api::Environment) on top of
//! a [`ScenarioSpec`] and a [`ManualClock`]. All dynamic state is a function
//! of the clock:
//!
//! - guards stand on `route[(t + offset) / step % len]`
//! - a worked rock shows a respawn marker until its respawn time passes
//! - other miners stand still in the world they were placed in
//!
//! Every action advances the clock by its simulated duration, so a run
//! against the simulation is reproducible for a fixed seed.

use std::time::Duration;

use bot_content::ScenarioSpec;
use bot_core::{ActionKind, Clock, ManualClock, NodeId, Position, ResourceNode, Timestamp};
use tracing::debug;

use crate::api::{ActionExecutor, Condition, PositionSource};

const POLL: Duration = Duration::from_millis(100);
const RELOCATE_DURATION: Duration = Duration::from_millis(3_000);
const MAX_WALK_STEPS: usize = 512;

/// One interaction attempt seen by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interaction {
    pub at: Timestamp,
    pub node: NodeId,
    pub action: ActionKind,
    pub landed: bool,
}

#[derive(Clone, Debug)]
struct SimRock {
    node: ResourceNode,
    respawn: Duration,
    depleted_until: Option<Timestamp>,
}

impl SimRock {
    fn is_depleted(&self, now: Timestamp) -> bool {
        self.depleted_until.is_some_and(|until| now < until)
    }
}

pub struct SimWorld {
    spec: ScenarioSpec,
    clock: ManualClock,
    agent: Position,
    rocks: Vec<SimRock>,
    world: u32,
    blind_until: Option<Timestamp>,
    can_relocate: bool,
    interactions: Vec<Interaction>,
}

impl SimWorld {
    pub fn new(spec: ScenarioSpec, clock: ManualClock) -> Self {
        let rocks = spec
            .nodes()
            .into_iter()
            .map(|(node, respawn_ms)| SimRock {
                node,
                respawn: Duration::from_millis(respawn_ms),
                depleted_until: None,
            })
            .collect();

        Self {
            agent: spec.agent_start,
            rocks,
            world: 0,
            blind_until: None,
            can_relocate: true,
            interactions: Vec::new(),
            spec,
            clock,
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn spec(&self) -> &ScenarioSpec {
        &self.spec
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn world(&self) -> u32 {
        self.world
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Makes every perception read fail until `until`.
    pub fn blind_until(&mut self, until: Timestamp) {
        self.blind_until = Some(until);
    }

    /// Makes [`ActionExecutor::relocate`] fail from now on.
    pub fn disable_relocation(&mut self) {
        self.can_relocate = false;
    }

    /// Marks a node depleted as if someone else had just worked it.
    pub fn deplete(&mut self, id: NodeId) {
        let now = self.clock.now();
        if let Some(rock) = self.rocks.iter_mut().find(|r| r.node.id == id) {
            rock.depleted_until = Some(now + rock.respawn);
        }
    }

    fn is_blind(&self) -> bool {
        let now = self.clock.now();
        self.blind_until.is_some_and(|until| now < until)
    }

    fn is_visible(&self, pos: Position) -> bool {
        self.spec.view.is_none_or(|view| view.contains(pos))
    }

    fn miners(&self) -> impl Iterator<Item = Position> + '_ {
        self.spec
            .miners
            .iter()
            .filter(|m| m.world == self.world)
            .map(|m| m.position)
    }

    /// One tile toward `target`, diagonals allowed.
    fn step_toward(from: Position, target: Position) -> Position {
        if from.x == target.x && from.y == target.y {
            return target;
        }
        from.offset((target.x - from.x).signum(), (target.y - from.y).signum())
    }

    fn walk_step(&mut self, target: Position) {
        self.agent = Self::step_toward(self.agent, target);
        self.clock.advance(Duration::from_millis(self.spec.tile_ms));
    }
}

impl PositionSource for SimWorld {
    fn self_position(&self) -> Option<Position> {
        (!self.is_blind()).then_some(self.agent)
    }

    fn threat_positions(&self) -> Option<Vec<Position>> {
        if self.is_blind() {
            return None;
        }
        let t = self.clock.now().as_millis();
        Some(
            self.spec
                .guards
                .iter()
                .filter_map(|guard| guard.position_at(t))
                .filter(|pos| self.is_visible(*pos))
                .collect(),
        )
    }

    fn candidate_nodes(&self) -> Option<Vec<ResourceNode>> {
        if self.is_blind() {
            return None;
        }
        Some(
            self.rocks
                .iter()
                .map(|rock| rock.node)
                .filter(|node| self.is_visible(node.position))
                .collect(),
        )
    }

    fn respawn_signals(&self) -> Option<Vec<Position>> {
        if self.is_blind() {
            return None;
        }
        let now = self.clock.now();
        Some(
            self.rocks
                .iter()
                .filter(|rock| rock.is_depleted(now))
                .map(|rock| rock.node.position)
                .collect(),
        )
    }

    fn other_agents(&self) -> Option<Vec<Position>> {
        if self.is_blind() {
            return None;
        }
        Some(self.miners().collect())
    }
}

impl ActionExecutor for SimWorld {
    fn interact(&mut self, node: &ResourceNode, action: ActionKind) -> bool {
        let Some(index) = self.rocks.iter().position(|r| r.node.id == node.id) else {
            self.clock.advance(POLL);
            return false;
        };
        let target = self.rocks[index].node.position;

        let mut steps = 0;
        while !self.agent.is_adjacent_or_on(target) && steps < MAX_WALK_STEPS {
            self.walk_step(target);
            steps += 1;
        }

        self.clock.advance(Duration::from_millis(self.spec.action_ms));
        let now = self.clock.now();
        let contested = self.miners().any(|m| m.is_adjacent_or_on(target));
        let rock = &mut self.rocks[index];

        let landed = if rock.is_depleted(now) {
            false
        } else {
            // Whoever gets there, the node is spent afterwards
            rock.depleted_until = Some(now + rock.respawn);
            !contested
        };

        debug!(node = %node.id, %action, landed, contested, "sim interaction");
        self.interactions.push(Interaction {
            at: now,
            node: node.id,
            action,
            landed,
        });
        landed
    }

    fn walk_to(&mut self, target: Position, break_condition: Condition<'_>) -> bool {
        for _ in 0..MAX_WALK_STEPS {
            if break_condition(&*self) || self.agent == target {
                return true;
            }
            self.walk_step(target);
        }
        self.agent == target
    }

    fn wait_until(&mut self, condition: Condition<'_>, timeout: Duration) -> bool {
        let start = self.clock.now();
        loop {
            if condition(&*self) {
                return true;
            }
            let waited = self.clock.now().elapsed_since(start);
            if waited >= timeout {
                return false;
            }
            self.clock.advance(POLL.min(timeout - waited));
        }
    }

    fn relocate(&mut self) -> bool {
        if !self.can_relocate {
            return false;
        }
        self.world = (self.world + 1) % self.spec.worlds.max(1);
        for rock in &mut self.rocks {
            rock.depleted_until = None;
        }
        self.clock.advance(RELOCATE_DURATION);
        debug!(world = self.world, "sim relocated");
        true
    }
}
