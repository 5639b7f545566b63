//! Core task trait.
//!
//! This module defines the [`Task`] trait, the capability interface every
//! schedulable behavior implements. The trait is generic over a context type
//! `C` (the shared blackboard), which tasks read in `activate` and mutate in
//! `execute`.

/// A named unit of behavior with an activation predicate and an action.
pub trait Task<C>: Send {
    /// Identifier used for diagnostics and tick results.
    fn name(&self) -> &'static str;

    /// Returns `true` if this task wants to run this tick.
    ///
    /// Takes a shared borrow so predicates cannot mutate the context. Called
    /// once per tick at most, and never cached across ticks.
    fn activate(&self, ctx: &C) -> bool;

    /// Runs the task.
    ///
    /// May block for a bounded wait before returning. The return value
    /// reports whether meaningful work happened; the scheduler does not
    /// retry within the same tick either way.
    fn execute(&mut self, ctx: &mut C) -> bool;
}

/// Blanket implementation for boxed tasks.
///
/// This allows `Box<dyn Task<C>>` to also implement `Task<C>`, enabling
/// decorators over heterogeneous task lists.
impl<C> Task<C> for Box<dyn Task<C>> {
    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn activate(&self, ctx: &C) -> bool {
        (**self).activate(ctx)
    }

    #[inline]
    fn execute(&mut self, ctx: &mut C) -> bool {
        (**self).execute(ctx)
    }
}

type Predicate<C> = Box<dyn Fn(&C) -> bool + Send>;
type Action<C> = Box<dyn FnMut(&mut C) -> bool + Send>;

/// A task assembled from a pair of closures.
///
/// Handy for small script-specific behaviors that don't warrant a struct.
pub struct FnTask<C> {
    name: &'static str,
    activate: Predicate<C>,
    execute: Action<C>,
}

impl<C> FnTask<C> {
    /// Creates a task from an activation predicate and an action.
    pub fn new(
        name: &'static str,
        activate: impl Fn(&C) -> bool + Send + 'static,
        execute: impl FnMut(&mut C) -> bool + Send + 'static,
    ) -> Self {
        Self {
            name,
            activate: Box::new(activate),
            execute: Box::new(execute),
        }
    }
}

impl<C> Task<C> for FnTask<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn activate(&self, ctx: &C) -> bool {
        (self.activate)(ctx)
    }

    fn execute(&mut self, ctx: &mut C) -> bool {
        (self.execute)(ctx)
    }
}
