//! Builder utilities for ergonomic task list construction.
//!
//! Instead of writing verbose `Box::new(Unless::new(Box::new(...), ...))`,
//! use shorter functions like `unless(child, blocked)`.

use crate::{FnTask, Task, Unless, When};

/// Creates a boxed task from closures.
///
/// Shorthand for `Box::new(FnTask::new(name, activate, execute))`.
#[inline]
pub fn task<C: 'static>(
    name: &'static str,
    activate: impl Fn(&C) -> bool + Send + 'static,
    execute: impl FnMut(&mut C) -> bool + Send + 'static,
) -> Box<dyn Task<C>> {
    Box::new(FnTask::new(name, activate, execute))
}

/// Creates an unless-decorated task.
///
/// Shorthand for `Box::new(Unless::new(child, blocked))`.
#[inline]
pub fn unless<C: 'static>(
    child: Box<dyn Task<C>>,
    blocked: impl Fn(&C) -> bool + Send + 'static,
) -> Box<dyn Task<C>> {
    Box::new(Unless::new(child, blocked))
}

/// Creates a when-decorated task.
///
/// Shorthand for `Box::new(When::new(child, enabled))`.
#[inline]
pub fn when<C: 'static>(
    child: Box<dyn Task<C>>,
    enabled: impl Fn(&C) -> bool + Send + 'static,
) -> Box<dyn Task<C>> {
    Box::new(When::new(child, enabled))
}
