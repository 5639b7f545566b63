//! Input side of the client.

use std::time::Duration;

use bot_core::{ActionKind, Position, ResourceNode};

use crate::api::perception::PositionSource;

/// Condition polled during walks and waits.
pub type Condition<'a> = &'a mut dyn FnMut(&dyn PositionSource) -> bool;

/// Issues simulated input. All calls may block for a bounded time.
pub trait ActionExecutor {
    /// Interacts with `node` using `action`. True if the interaction landed.
    fn interact(&mut self, node: &ResourceNode, action: ActionKind) -> bool;

    /// Walks toward `target`, stopping early once `break_condition` holds.
    ///
    /// True when the walk arrived or was broken off by the condition.
    fn walk_to(&mut self, target: Position, break_condition: Condition<'_>) -> bool;

    /// Polls `condition` until it holds or `timeout` elapses.
    ///
    /// Expiry is not an error: callers assume the action finished or
    /// silently failed and carry on.
    fn wait_until(&mut self, condition: Condition<'_>, timeout: Duration) -> bool;

    /// Moves to another world/instance. False when relocation is impossible.
    fn relocate(&mut self) -> bool;
}

/// A client that can both be read and driven.
pub trait Environment: PositionSource + ActionExecutor + Send {
    fn as_source(&self) -> &dyn PositionSource;
}

impl<T: PositionSource + ActionExecutor + Send> Environment for T {
    fn as_source(&self) -> &dyn PositionSource {
        self
    }
}
