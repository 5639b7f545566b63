//! Task decorators.
//!
//! Decorators wrap a single task and narrow when it may activate. Because
//! the scheduler only ever runs the first activated task, lower-priority
//! tasks encode mutual exclusion through their own predicates; these
//! wrappers make that explicit without touching the wrapped task.

use crate::Task;

type Predicate<C> = Box<dyn Fn(&C) -> bool + Send>;

/// Blocks the wrapped task while a condition holds.
///
/// # Semantics
///
/// - If `blocked(ctx)` is true, the decorator does not activate
/// - Otherwise it activates exactly when the child does
///
/// Typical use: "work, unless currently fleeing".
pub struct Unless<C> {
    child: Box<dyn Task<C>>,
    blocked: Predicate<C>,
}

impl<C> Unless<C> {
    /// Wraps `child` so it never activates while `blocked` returns true.
    pub fn new(child: Box<dyn Task<C>>, blocked: impl Fn(&C) -> bool + Send + 'static) -> Self {
        Self {
            child,
            blocked: Box::new(blocked),
        }
    }
}

impl<C> Task<C> for Unless<C> {
    fn name(&self) -> &'static str {
        self.child.name()
    }

    fn activate(&self, ctx: &C) -> bool {
        !(self.blocked)(ctx) && self.child.activate(ctx)
    }

    fn execute(&mut self, ctx: &mut C) -> bool {
        self.child.execute(ctx)
    }
}

/// Enables the wrapped task only while a condition holds.
///
/// The opposite of [`Unless`]: the child may activate only when
/// `enabled(ctx)` is true.
pub struct When<C> {
    child: Box<dyn Task<C>>,
    enabled: Predicate<C>,
}

impl<C> When<C> {
    /// Wraps `child` so it only activates while `enabled` returns true.
    pub fn new(child: Box<dyn Task<C>>, enabled: impl Fn(&C) -> bool + Send + 'static) -> Self {
        Self {
            child,
            enabled: Box::new(enabled),
        }
    }
}

impl<C> Task<C> for When<C> {
    fn name(&self) -> &'static str {
        self.child.name()
    }

    fn activate(&self, ctx: &C) -> bool {
        (self.enabled)(ctx) && self.child.activate(ctx)
    }

    fn execute(&mut self, ctx: &mut C) -> bool {
        self.child.execute(ctx)
    }
}
