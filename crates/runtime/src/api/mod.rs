//! Public runtime API surface.
//!
//! The traits here are the narrow seams between the decision core and the
//! client it drives: perception flows in through [`PositionSource`], input
//! flows out through [`ActionExecutor`], and reporting collaborators read
//! [`Diagnostics`] through a [`DiagnosticsSink`].

pub mod diagnostics;
pub mod errors;
pub mod executor;
pub mod perception;

pub use diagnostics::{
    Counters, Diagnostics, DiagnosticsSink, NullSink, SharedDiagnostics, TracingSink,
};
pub use errors::{Result, RuntimeError, StopReason};
pub use executor::{ActionExecutor, Condition, Environment};
pub use perception::{Perception, PositionSource};
