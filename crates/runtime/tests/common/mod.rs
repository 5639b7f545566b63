//! Scripted environment shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bot_core::{ActionKind, ManualClock, NodeId, Position, ResourceNode};
use bot_runtime::{ActionExecutor, Condition, PositionSource};

/// World state the test edits between ticks.
#[derive(Debug, Default)]
pub struct Script {
    pub self_position: Option<Position>,
    pub threats: Option<Vec<Position>>,
    pub nodes: Option<Vec<ResourceNode>>,
    pub respawn: Option<Vec<Position>>,
    pub others: Option<Vec<Position>>,
    /// Result returned by every interaction.
    pub interact_result: bool,
    /// Worked nodes start showing a respawn marker.
    pub deplete_on_interact: bool,
    pub can_relocate: bool,
    pub interactions: Vec<(NodeId, ActionKind)>,
    pub walks: Vec<Position>,
    pub relocations: u32,
}

/// Environment whose state lives behind a shared handle.
#[derive(Clone)]
pub struct StubEnv {
    script: Arc<Mutex<Script>>,
    clock: ManualClock,
}

impl StubEnv {
    pub fn new(clock: ManualClock, script: Script) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            clock,
        }
    }

    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }
}

/// Everything readable, nothing in view.
pub fn open_script(at: Position) -> Script {
    Script {
        self_position: Some(at),
        threats: Some(vec![]),
        nodes: Some(vec![]),
        respawn: Some(vec![]),
        others: Some(vec![]),
        interact_result: true,
        deplete_on_interact: true,
        can_relocate: true,
        ..Script::default()
    }
}

impl PositionSource for StubEnv {
    fn self_position(&self) -> Option<Position> {
        self.script().self_position
    }

    fn threat_positions(&self) -> Option<Vec<Position>> {
        self.script().threats.clone()
    }

    fn candidate_nodes(&self) -> Option<Vec<ResourceNode>> {
        self.script().nodes.clone()
    }

    fn respawn_signals(&self) -> Option<Vec<Position>> {
        self.script().respawn.clone()
    }

    fn other_agents(&self) -> Option<Vec<Position>> {
        self.script().others.clone()
    }
}

impl ActionExecutor for StubEnv {
    fn interact(&mut self, node: &ResourceNode, action: ActionKind) -> bool {
        self.clock.advance(Duration::from_millis(600));
        let mut script = self.script();
        script.interactions.push((node.id, action));
        if script.deplete_on_interact {
            script.respawn.get_or_insert_with(Vec::new).push(node.position);
        }
        script.interact_result
    }

    fn walk_to(&mut self, target: Position, _break_condition: Condition<'_>) -> bool {
        self.clock.advance(Duration::from_millis(600));
        let mut script = self.script();
        script.walks.push(target);
        script.self_position = Some(target);
        true
    }

    fn wait_until(&mut self, condition: Condition<'_>, timeout: Duration) -> bool {
        if condition(&*self) {
            return true;
        }
        self.clock.advance(timeout);
        false
    }

    fn relocate(&mut self) -> bool {
        let mut script = self.script();
        if !script.can_relocate {
            return false;
        }
        script.relocations += 1;
        true
    }
}
