//! Environment-driven configuration for the `botctl` binary.
use std::env;
use std::path::PathBuf;

use bot_runtime::RuntimeConfig;

/// Command-line run configuration.
///
/// Profiles and scenarios are given either as a bundled name
/// (`cannonball`) or as a path to a `.toml`/`.ron` file.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub profile: String,
    pub scenario: String,
    /// Task list from `bot_runtime::presets`.
    pub preset: String,
    /// Content directory for bundled names (defaults to the shipped data).
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub runtime: RuntimeConfig,
    /// Pretty-print the run summary.
    pub pretty: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            profile: "cannonball".into(),
            scenario: "stall_patrol".into(),
            preset: "thieving".into(),
            data_dir: None,
            seed: None,
            runtime: RuntimeConfig {
                max_ticks: Some(500),
                ..RuntimeConfig::default()
            },
            pretty: true,
        }
    }
}

impl CliConfig {
    /// Construct configuration from environment variables.
    ///
    /// Call after logging is initialised: values that fail to parse are
    /// reported with a warning and replaced by the default.
    ///
    /// Environment variables:
    /// - `BOT_PROFILE` - Profile name or path (default: cannonball)
    /// - `BOT_SCENARIO` - Scenario name or path (default: stall_patrol)
    /// - `BOT_PRESET` - Task list name (default: thieving)
    /// - `BOT_DATA_DIR` - Content directory for bundled names
    /// - `BOT_SEED` - RNG seed for reproducible runs (default: OS entropy)
    /// - `BOT_MAX_TICKS` - Tick limit, 0 for unbounded (default: 500)
    /// - `BOT_IDLE_BACKOFF_MS` - Pause after idle ticks (default: 600)
    /// - `BOT_SUMMARY_PRETTY` - Pretty-print the JSON summary (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(profile) = env::var("BOT_PROFILE") {
            config.profile = profile;
        }
        if let Ok(scenario) = env::var("BOT_SCENARIO") {
            config.scenario = scenario;
        }
        if let Ok(preset) = env::var("BOT_PRESET") {
            config.preset = preset;
        }
        config.data_dir = env::var_os("BOT_DATA_DIR").map(PathBuf::from);
        config.seed = read_env("BOT_SEED");
        if let Some(max_ticks) = read_env::<u64>("BOT_MAX_TICKS") {
            config.runtime.max_ticks = (max_ticks > 0).then_some(max_ticks);
        }
        if let Some(backoff) = read_env("BOT_IDLE_BACKOFF_MS") {
            config.runtime.idle_backoff_ms = backoff;
        }
        if let Some(pretty) = read_env("BOT_SUMMARY_PRETTY") {
            config.pretty = pretty;
        }

        config
    }
}

/// `BOT_LOG_DIR`: also write logs to this directory.
///
/// Read separately from [`CliConfig::from_env`] because it is needed before
/// the subscriber exists.
pub fn log_dir_from_env() -> Option<PathBuf> {
    env::var_os("BOT_LOG_DIR").map(PathBuf::from)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_var(key, env::var(key).ok()?.as_str())
}

fn parse_var<T>(key: &str, raw: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}; using the default", key, raw, e);
            None
        }
    }
}
