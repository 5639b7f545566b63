//! Error types surfaced by the runtime API.
//!
//! Only terminal conditions become errors. Perception gaps, failed
//! interactions and expired waits are recovered inside tasks and show up as
//! counters instead.
use bot_core::{ConfigError, Landmark};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("run stopped: {reason}")]
    Stopped { reason: StopReason },

    #[error("runtime requires at least one task")]
    NoTasks,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RuntimeError {
    pub fn stop_reason(&self) -> Option<&StopReason> {
        match self {
            Self::Stopped { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Precondition failures that end a run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StopReason {
    #[error("own position unavailable after {attempts} attempts")]
    NoSelfPosition { attempts: u32 },

    #[error("landmark '{0}' is not configured")]
    MissingLandmark(Landmark),

    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ConfigError),

    #[error("relocation failed: {0}")]
    RelocationUnavailable(&'static str),

    #[error("no node worked for {idle_secs} s")]
    Stuck { idle_secs: u64 },
}
