//! Deterministic decision logic for the bot runtime.
//!
//! `bot-core` holds the pure parts of the automation loop: grid geometry,
//! clocks and injected randomness, the patrol [`HazardTracker`], the
//! time-windowed [`ResourceBlacklist`] with its [`TargetSelector`], crowd
//! detection and the validated [`BotProfile`]. Nothing here performs I/O;
//! the runtime feeds perception in and acts on the decisions.
pub mod action;
pub mod blacklist;
pub mod config;
pub mod crowd;
pub mod error;
pub mod geometry;
pub mod hazard;
pub mod random;
pub mod resource;
pub mod selection;
pub mod time;

pub use action::{ActionKind, Landmark};
pub use blacklist::{BlacklistConfig, DEFAULT_BLACKLIST_EXPIRY, ResourceBlacklist};
pub use config::{BotProfile, DEFAULT_STUCK_TIMEOUT_MS, RetryConfig, Site};
pub use crowd::{CrowdConfig, CrowdMonitor};
pub use error::{ConfigError, ConfigResult};
pub use geometry::{Area, Position};
pub use hazard::{DangerTier, HazardConfig, HazardTracker, PatrolLane};
pub use random::{BoxedRng, ReactionDelay, UniformDelay, entropy_rng, seeded_rng};
pub use resource::{NodeId, RespawnSignal, ResourceNode};
pub use selection::{CandidateTier, Selection, SelectionInput, TargetSelector};
pub use time::{Clock, ManualClock, SystemClock, Timer, Timestamp};
