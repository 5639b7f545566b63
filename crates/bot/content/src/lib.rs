//! Data-driven bot content and its loaders.
//!
//! This crate turns files into validated core configuration:
//! - Bot profiles (TOML): activity, landmarks, patrol lanes, budgets
//! - Scenarios (RON): a deterministic world for the simulated environment
//!
//! Profiles are validated by [`bot_core::BotProfile::validate`] before they are
//! handed out, so a loaded profile is always runnable.

pub mod loaders;
pub mod scenario;

pub use loaders::{ContentFactory, LoadResult, ProfileLoader, ScenarioLoader};
pub use scenario::{GuardRoute, MinerSpec, RockSpec, ScenarioSpec};
