//! Contested resource gathering.
//!
//! One execution is one attempt on one node:
//!
//! 1. stop the run if nothing was worked for the stuck timeout
//! 2. walk into the work area if outside it
//! 3. prune the blacklist and release entries whose node visibly respawned
//! 4. select a target; relocate when there is nothing to work
//! 5. interact, wait for the node to deplete, then claim it
//!
//! The claim happens after every real attempt, successful or not. Merely
//! considering a node never blacklists it.

use bot_core::{
    Area, BotProfile, CandidateTier, Landmark, Position, RespawnSignal, ResourceNode, Selection,
    SelectionInput,
};
use task_scheduler::Task;
use tracing::{debug, info, warn};

use crate::api::StopReason;
use crate::context::BotContext;
use crate::tasks::{RetryCounter, hop};

/// Works the best available node in the work area.
///
/// Activates whenever the agent's own position is readable; callers wrap it
/// (see [`crate::presets::mining`]) to keep it from running while in danger.
pub struct Mine {
    retry: RetryCounter,
}

impl Mine {
    pub fn new(profile: &BotProfile) -> Self {
        Self {
            retry: RetryCounter::new(profile.retry.interaction_failures),
        }
    }

    fn select(&self, ctx: &BotContext, agent: Position) -> Selection {
        let empty = RespawnSignal::new();
        let perception = &ctx.perception;
        ctx.selector.select(
            SelectionInput {
                candidates: perception.selectable_candidates(),
                respawn: perception.respawn.as_ref().unwrap_or(&empty),
                other_agents: perception.other_agents_or_empty(),
                agent: Some(agent),
                hint: ctx.target_hint,
            },
            &ctx.blacklist,
            perception.at,
        )
    }

    fn work(
        &mut self,
        ctx: &mut BotContext,
        area: Area,
        node: ResourceNode,
        tier: CandidateTier,
    ) -> bool {
        if tier == CandidateTier::Contested {
            warn!(node = %node.id, "every node is contested, proceeding anyway");
        }

        let action = ctx.profile.action;
        let landed = ctx.env.interact(&node, action);
        if landed {
            let timeout = ctx.profile.retry.interaction_timeout();
            let depleted = ctx.env.wait_until(
                &mut |env| {
                    env.respawn_signals()
                        .is_some_and(|signals| signals.contains(&node.position))
                },
                timeout,
            );
            debug!(node = %node.id, depleted, "interaction finished");
        }

        let now = ctx.now();
        ctx.blacklist.claim(node.position, now);

        if landed {
            ctx.counters.nodes_worked += 1;
            ctx.target_hint = Some(node.position);
            ctx.mark_progress();
            self.retry.reset();
            return true;
        }

        ctx.counters.interaction_failures += 1;
        if self.retry.record_failure() {
            ctx.counters.escalations += 1;
            ctx.target_hint = None;
            warn!(
                failures = self.retry.limit(),
                "repeated interaction failures, re-walking into work area"
            );
            let center = area.center();
            ctx.env
                .walk_to(center, &mut |env| env.self_position() == Some(center));
        }
        false
    }
}

impl Task<BotContext> for Mine {
    fn name(&self) -> &'static str {
        "mine"
    }

    fn activate(&self, ctx: &BotContext) -> bool {
        ctx.perception.self_position.is_some()
    }

    fn execute(&mut self, ctx: &mut BotContext) -> bool {
        let idle = ctx.idle_for();
        if idle >= ctx.profile.stuck_timeout() {
            ctx.request_stop(StopReason::Stuck {
                idle_secs: idle.as_secs(),
            });
            return false;
        }

        let Some(area) = ctx.profile.area(Landmark::WorkArea) else {
            ctx.request_stop(StopReason::MissingLandmark(Landmark::WorkArea));
            return false;
        };
        let Some(agent) = ctx.perception.self_position else {
            return false;
        };

        if !area.contains(agent) {
            let center = area.center();
            info!(%agent, %center, "outside work area, walking back");
            return ctx.env.walk_to(center, &mut |env| {
                env.self_position().is_some_and(|p| area.contains(p))
            });
        }

        let now = ctx.perception.at;
        ctx.blacklist.prune(now);
        if let (Some(respawn), Some(candidates)) =
            (&ctx.perception.respawn, &ctx.perception.candidates)
        {
            let visible: Vec<Position> = candidates.iter().map(|node| node.position).collect();
            let released = ctx.blacklist.reconcile(respawn, &visible, now);
            ctx.counters.early_releases += released.len() as u64;
        }

        match self.select(ctx, agent) {
            Selection::Unavailable => false,
            Selection::Relocate => hop::relocate(ctx, "no usable nodes in view"),
            Selection::Target { node, tier } => self.work(ctx, area, node, tier),
        }
    }
}
