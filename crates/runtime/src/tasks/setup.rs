use std::time::Duration;

use bot_core::BotProfile;
use task_scheduler::Task;
use tracing::info;

use crate::api::StopReason;
use crate::context::BotContext;

const POSITION_POLL: Duration = Duration::from_millis(1_000);

/// Verifies run preconditions once before any other task runs.
///
/// Fails the run when the agent's own position cannot be read within the
/// configured number of attempts, or when a landmark the activity needs is
/// missing.
pub struct Setup {
    attempts: u32,
}

impl Setup {
    pub fn new(profile: &BotProfile) -> Self {
        Self {
            attempts: profile.retry.setup_attempts.max(1),
        }
    }
}

impl Task<BotContext> for Setup {
    fn name(&self) -> &'static str {
        "setup"
    }

    fn activate(&self, ctx: &BotContext) -> bool {
        !ctx.setup_complete
    }

    fn execute(&mut self, ctx: &mut BotContext) -> bool {
        if let Some(missing) = ctx
            .profile
            .required_landmarks()
            .into_iter()
            .find(|landmark| ctx.profile.site(*landmark).is_none())
        {
            ctx.request_stop(StopReason::MissingLandmark(missing));
            return false;
        }

        let mut found = ctx.perception.self_position.is_some();
        let mut attempt = 1;
        while !found && attempt < self.attempts {
            attempt += 1;
            found = ctx
                .env
                .wait_until(&mut |env| env.self_position().is_some(), POSITION_POLL);
        }

        if !found {
            ctx.request_stop(StopReason::NoSelfPosition {
                attempts: self.attempts,
            });
            return false;
        }

        ctx.setup_complete = true;
        info!(
            profile = %ctx.profile.name,
            action = %ctx.profile.action,
            attempts = attempt,
            "setup complete"
        );
        true
    }
}
