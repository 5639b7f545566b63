use task_scheduler::Task;
use tracing::info;

use crate::api::StopReason;
use crate::context::BotContext;

/// Changes world when other agents linger in the work area.
///
/// Activates only once the crowd monitor reports crowding and the previous
/// hop's cooldown has passed.
#[derive(Debug, Default)]
pub struct HopWorld;

impl Task<BotContext> for HopWorld {
    fn name(&self) -> &'static str {
        "hop_world"
    }

    fn activate(&self, ctx: &BotContext) -> bool {
        ctx.crowd.is_crowded() && ctx.perception.at >= ctx.next_hop_at
    }

    fn execute(&mut self, ctx: &mut BotContext) -> bool {
        relocate(ctx, "work area crowded")
    }
}

/// Relocates and resets everything tied to the old world.
///
/// A client that cannot relocate ends the run.
pub(crate) fn relocate(ctx: &mut BotContext, why: &'static str) -> bool {
    info!(why, "relocating");
    if !ctx.env.relocate() {
        ctx.request_stop(StopReason::RelocationUnavailable(why));
        return false;
    }

    let now = ctx.now();
    ctx.crowd.reset_after_relocation(now);
    let cooldown = ctx.crowd.next_hop_cooldown();
    ctx.next_hop_at = now + cooldown;
    ctx.target_hint = None;
    ctx.counters.relocations += 1;
    info!(
        cooldown_secs = cooldown.as_secs_f64(),
        relocations = ctx.counters.relocations,
        "relocated"
    );
    true
}
