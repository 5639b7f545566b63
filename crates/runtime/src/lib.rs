//! Runtime orchestration for the automation loop.
//!
//! This crate wires the priority scheduler, the decision core and a client
//! environment into a tick-driven runtime. Consumers build a [`BotContext`]
//! around an [`Environment`], pick a task list from [`presets`], and drive it
//! with [`Runtime`].
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the client seams, diagnostics and error types
//! - [`context`] holds the per-run blackboard passed to every task
//! - [`tasks`] and [`presets`] provide reusable behaviors and their orderings
//! - [`runtime`] hosts the tick driver and builder
//! - [`scenario`] provides a deterministic simulated client
pub mod api;
pub mod context;
pub mod presets;
pub mod runtime;
pub mod scenario;
pub mod tasks;

pub use api::{
    ActionExecutor, Condition, Counters, Diagnostics, DiagnosticsSink, Environment, NullSink,
    Perception, PositionSource, Result, RuntimeError, SharedDiagnostics, StopReason, TracingSink,
};
pub use context::BotContext;
pub use presets::TaskList;
pub use runtime::{RunSummary, Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::{Interaction, SimWorld};
