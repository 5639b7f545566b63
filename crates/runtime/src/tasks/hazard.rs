//! Hazard avoidance around a patrolling threat.
//!
//! The three tasks split the safety tile into disjoint situations so that at
//! most one of them can activate in any tick:
//!
//! | agent on safety tile | lane clear | task          |
//! |----------------------|------------|---------------|
//! | no                   | (danger)   | `Retreat`     |
//! | yes                  | no         | `WaitAtSafety`|
//! | yes                  | yes        | `ReturnToWork`|

use std::time::Duration;

use bot_core::{DangerTier, Landmark};
use task_scheduler::Task;
use tracing::{debug, info, warn};

use crate::api::StopReason;
use crate::context::BotContext;

const SAFETY_POLL: Duration = Duration::from_millis(600);

fn hazard_enabled(ctx: &BotContext) -> bool {
    ctx.profile.hazard.is_enabled()
}

/// Strict resume check against this tick's snapshot.
///
/// Unreadable threat positions count as not clear.
fn lane_clear(ctx: &BotContext) -> bool {
    ctx.perception
        .threats
        .as_deref()
        .is_some_and(|threats| ctx.hazard.is_clear(threats))
}

/// Walks to the safety tile once the hazard tracker reports danger.
#[derive(Debug, Default)]
pub struct Retreat;

impl Task<BotContext> for Retreat {
    fn name(&self) -> &'static str {
        "retreat"
    }

    fn activate(&self, ctx: &BotContext) -> bool {
        hazard_enabled(ctx)
            && ctx.in_danger()
            && ctx.perception.self_position.is_some()
            && !ctx.is_at(Landmark::Safety)
    }

    fn execute(&mut self, ctx: &mut BotContext) -> bool {
        let Some(safety) = ctx.landmark(Landmark::Safety) else {
            ctx.request_stop(StopReason::MissingLandmark(Landmark::Safety));
            return false;
        };

        ctx.counters.retreats += 1;
        info!(tier = %ctx.hazard.tier(), %safety, "retreating");

        let timeout = ctx.profile.retry.walk_timeout();
        ctx.env
            .walk_to(safety, &mut |env| env.self_position() == Some(safety));
        let arrived = ctx
            .env
            .wait_until(&mut |env| env.self_position() == Some(safety), timeout);
        if !arrived {
            warn!(%safety, "safety tile not reached in time");
        }
        arrived
    }
}

/// Idles on the safety tile while the lane is occupied.
#[derive(Debug, Default)]
pub struct WaitAtSafety;

impl Task<BotContext> for WaitAtSafety {
    fn name(&self) -> &'static str {
        "wait_at_safety"
    }

    fn activate(&self, ctx: &BotContext) -> bool {
        hazard_enabled(ctx) && ctx.is_at(Landmark::Safety) && !lane_clear(ctx)
    }

    fn execute(&mut self, ctx: &mut BotContext) -> bool {
        let hazard = &ctx.hazard;
        let cleared = ctx.env.wait_until(
            &mut |env| {
                env.threat_positions()
                    .is_some_and(|threats| hazard.is_clear(&threats))
            },
            SAFETY_POLL,
        );
        debug!(cleared, "waiting at safety");
        cleared
    }
}

/// Walks back to the work spot once the whole lane is clear.
#[derive(Debug, Default)]
pub struct ReturnToWork;

impl Task<BotContext> for ReturnToWork {
    fn name(&self) -> &'static str {
        "return_to_work"
    }

    fn activate(&self, ctx: &BotContext) -> bool {
        hazard_enabled(ctx)
            && ctx.is_at(Landmark::Safety)
            && lane_clear(ctx)
            && !ctx.in_danger()
    }

    fn execute(&mut self, ctx: &mut BotContext) -> bool {
        let threats = ctx.perception.threats_or_empty().to_vec();
        if !ctx.hazard.is_safe_to_resume(&threats) {
            return false;
        }
        let Some(spot) = ctx.landmark(Landmark::WorkSpot) else {
            ctx.request_stop(StopReason::MissingLandmark(Landmark::WorkSpot));
            return false;
        };

        ctx.counters.returns += 1;
        info!(%spot, "lane clear, returning to work");

        // Abort the walk if the threat comes back into the lane
        let hazard = &ctx.hazard;
        ctx.env.walk_to(spot, &mut |env| {
            env.self_position() == Some(spot)
                || env
                    .threat_positions()
                    .is_some_and(|threats| hazard.classify(&threats) != DangerTier::Safe)
        })
    }
}
