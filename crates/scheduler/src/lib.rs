//! Priority-ordered task scheduler for tick-driven bots.
//!
//! This library provides a minimal, deterministic scheduler designed for
//! control loops that poll an environment and run exactly one behavior per
//! tick.
//!
//! - **Priority by position**: The first task in the list wins; there is no
//!   separate priority field
//! - **At most one execution per tick**: Lower-priority tasks never run in a
//!   tick where a higher-priority task activated
//! - **Read-only predicates**: `activate` only sees a shared borrow of the
//!   context, all mutation happens in `execute`
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Task`]: Core trait for all schedulable behaviors
//! - [`Scheduler`]: Ordered task list evaluated once per tick
//! - [`TickResult`]: What happened during a tick
//! - Decorators: [`Unless`], [`When`]

pub mod builder;
pub mod decorator;
pub mod outcome;
pub mod scheduler;
pub mod task;

// Re-export core types for ergonomic API
pub use builder::{task, unless, when};
pub use decorator::{Unless, When};
pub use outcome::TickResult;
pub use scheduler::Scheduler;
pub use task::{FnTask, Task};
