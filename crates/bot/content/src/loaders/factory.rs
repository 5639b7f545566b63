//! Content factory resolving profile and scenario names to files.

use std::path::{Path, PathBuf};

use bot_core::BotProfile;

use crate::loaders::{LoadResult, ProfileLoader, ScenarioLoader};
use crate::scenario::ScenarioSpec;

/// Loads named content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── profiles/
/// │   ├── cannonball.toml
/// │   └── gem_mine.toml
/// └── scenarios/
///     ├── stall_patrol.ron
///     └── gem_mine.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("profiles").join(format!("{}.toml", name))
    }

    pub fn scenario_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("scenarios").join(format!("{}.ron", name))
    }

    /// Load `profiles/{name}.toml`.
    pub fn load_profile(&self, name: &str) -> LoadResult<BotProfile> {
        ProfileLoader::load(&self.profile_path(name))
    }

    /// Load `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<ScenarioSpec> {
        ScenarioLoader::load(&self.scenario_path(name))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
