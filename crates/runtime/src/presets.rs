//! Ready-made task lists for the supported activities.
//!
//! List order is priority: safety-critical tasks come first so they are
//! always checked before routine work.
//!
//! ```text
//! thieving                     mining
//!   ├─ setup                     ├─ setup
//!   ├─ retreat                   ├─ retreat        (only with hazard lanes)
//!   ├─ wait_at_safety            ├─ hop_world
//!   ├─ return_to_work            └─ mine (unless in danger)
//!   └─ work_station (unless on safety tile or in danger)
//! ```

use bot_core::{BotProfile, Landmark};
use task_scheduler::{Task, unless};

use crate::context::BotContext;
use crate::tasks::{HopWorld, Mine, Retreat, ReturnToWork, Setup, WaitAtSafety, WorkStation};

pub type TaskList = Vec<Box<dyn Task<BotContext>>>;

/// Fixed-spot work next to a patrolling guard.
pub fn thieving(profile: &BotProfile) -> TaskList {
    vec![
        Box::new(Setup::new(profile)),
        Box::new(Retreat),
        Box::new(WaitAtSafety),
        Box::new(ReturnToWork),
        unless(Box::new(WorkStation::new(profile)), |ctx: &BotContext| {
            ctx.is_at(Landmark::Safety) || ctx.in_danger()
        }),
    ]
}

/// Shared resource nodes with blacklist-based target selection.
pub fn mining(profile: &BotProfile) -> TaskList {
    let mut tasks: TaskList = vec![Box::new(Setup::new(profile))];
    if profile.hazard.is_enabled() {
        tasks.push(Box::new(Retreat));
    }
    tasks.push(Box::new(HopWorld));
    tasks.push(unless(Box::new(Mine::new(profile)), |ctx: &BotContext| {
        ctx.in_danger()
    }));
    tasks
}

/// Preset names accepted by [`by_name`].
pub const NAMES: [&str; 2] = ["thieving", "mining"];

pub fn by_name(name: &str, profile: &BotProfile) -> Option<TaskList> {
    match name {
        "thieving" => Some(thieving(profile)),
        "mining" => Some(mining(profile)),
        _ => None,
    }
}
