use std::time::Duration;

use bot_core::{BotProfile, Landmark, ResourceNode};
use task_scheduler::Task;
use tracing::{debug, warn};

use crate::api::StopReason;
use crate::context::BotContext;
use crate::tasks::RetryCounter;

const RESTOCK_POLL: Duration = Duration::from_millis(600);

/// Interacts with a node next to a fixed work spot, over and over.
///
/// Walks to the work spot first if the agent is elsewhere. After the
/// configured number of failed interactions in a row it re-walks to the spot
/// instead of tapping again.
pub struct WorkStation {
    retry: RetryCounter,
}

impl WorkStation {
    pub fn new(profile: &BotProfile) -> Self {
        Self {
            retry: RetryCounter::new(profile.retry.interaction_failures),
        }
    }
}

/// Nearest live node on or next to `spot`.
fn station_node(ctx: &BotContext, spot: bot_core::Position) -> Option<ResourceNode> {
    let respawn = ctx.perception.respawn.as_ref()?;
    ctx.perception
        .candidates
        .as_deref()?
        .iter()
        .filter(|node| !respawn.contains(node.position) && node.position.is_adjacent_or_on(spot))
        .min_by(|a, b| {
            spot.distance_to(a.position)
                .total_cmp(&spot.distance_to(b.position))
        })
        .copied()
}

impl Task<BotContext> for WorkStation {
    fn name(&self) -> &'static str {
        "work_station"
    }

    fn activate(&self, ctx: &BotContext) -> bool {
        ctx.perception.self_position.is_some()
    }

    fn execute(&mut self, ctx: &mut BotContext) -> bool {
        let Some(spot) = ctx.landmark(Landmark::WorkSpot) else {
            ctx.request_stop(StopReason::MissingLandmark(Landmark::WorkSpot));
            return false;
        };

        if !ctx.perception.is_at(spot) {
            debug!(%spot, "walking to work spot");
            return ctx
                .env
                .walk_to(spot, &mut |env| env.self_position() == Some(spot));
        }

        let Some(node) = station_node(ctx, spot) else {
            // Stall empty or unreadable; give it a moment
            ctx.env.wait_until(&mut |_| false, RESTOCK_POLL);
            return false;
        };

        let action = ctx.profile.action;
        if ctx.env.interact(&node, action) {
            ctx.counters.nodes_worked += 1;
            ctx.mark_progress();
            self.retry.reset();
            debug!(node = %node.id, %action, "interaction landed");
            return true;
        }

        ctx.counters.interaction_failures += 1;
        if self.retry.record_failure() {
            ctx.counters.escalations += 1;
            warn!(
                failures = self.retry.limit(),
                "repeated interaction failures, re-walking to work spot"
            );
            ctx.env
                .walk_to(spot, &mut |env| env.self_position() == Some(spot));
        }
        false
    }
}
