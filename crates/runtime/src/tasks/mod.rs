//! Reusable tasks.
//!
//! Each task is an independent unit implementing [`task_scheduler::Task`]
//! over [`crate::BotContext`]. Activity specifics (which action, which
//! landmarks, which budgets) come from the profile, so the same task serves
//! every script that needs it.
//!
//! - [`Setup`]: one-time precondition checks
//! - [`Retreat`], [`WaitAtSafety`], [`ReturnToWork`]: hazard avoidance
//! - [`WorkStation`]: fixed-spot interaction loop (stalls, ranges)
//! - [`Mine`]: contested resource loop with blacklist and target selection
//! - [`HopWorld`]: relocation when the work area is crowded

pub mod hazard;
pub mod hop;
pub mod mining;
pub mod retry;
pub mod setup;
pub mod workstation;

pub use hazard::{Retreat, ReturnToWork, WaitAtSafety};
pub use hop::HopWorld;
pub use mining::Mine;
pub use retry::RetryCounter;
pub use setup::Setup;
pub use workstation::WorkStation;
