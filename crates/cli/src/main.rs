//! Runs a bot profile against a simulated scenario.
//!
//! The binary is the composition root: it loads content, builds the
//! simulated client, the context and the task list, then drives the
//! runtime and prints the run summary as JSON on stdout.
//!
//! ```bash
//! BOT_PROFILE=gem_mine BOT_SCENARIO=gem_mine BOT_PRESET=mining BOT_SEED=7 \
//!     cargo run -p bot-cli
//! ```
mod config;
mod logging;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use bot_content::{ContentFactory, ProfileLoader, ScenarioLoader, ScenarioSpec};
use bot_core::{BotProfile, ManualClock};
use bot_runtime::{BotContext, Runtime, SimWorld, presets};

use crate::config::CliConfig;

fn main() -> Result<ExitCode> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = logging::setup_logging(config::log_dir_from_env().as_deref())?;
    let config = CliConfig::from_env();

    tracing::info!(
        profile = %config.profile,
        scenario = %config.scenario,
        preset = %config.preset,
        seed = ?config.seed,
        "starting run"
    );

    let content = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    let profile = load_profile(&content, &config.profile)?;
    let scenario = load_scenario(&content, &config.scenario)?;

    let tasks = presets::by_name(&config.preset, &profile).ok_or_else(|| {
        anyhow!(
            "unknown preset '{}' (expected one of {:?})",
            config.preset,
            presets::NAMES
        )
    })?;

    let clock = ManualClock::new();
    let world = SimWorld::new(scenario, clock.clone());
    let context = BotContext::new(profile, Box::new(world), Arc::new(clock), config.seed)
        .context("invalid profile")?;

    let mut runtime = Runtime::builder()
        .config(config.runtime.clone())
        .tasks(tasks)
        .build(context)?;
    let summary = runtime.run()?;

    let json = if config.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");

    match &summary.stop_reason {
        Some(reason) => {
            tracing::error!("run stopped: {}", reason);
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

/// Treats values ending in `.toml` as paths, anything else as a bundled name.
fn load_profile(content: &ContentFactory, name: &str) -> Result<BotProfile> {
    if name.ends_with(".toml") {
        ProfileLoader::load(Path::new(name))
    } else {
        content.load_profile(name)
    }
}

fn load_scenario(content: &ContentFactory, name: &str) -> Result<ScenarioSpec> {
    if name.ends_with(".ron") {
        ScenarioLoader::load(Path::new(name))
    } else {
        content.load_scenario(name)
    }
}
