//! Loaders reading profiles and scenarios from disk.

pub mod factory;
pub mod profile;
pub mod scenario;

pub use factory::ContentFactory;
pub use profile::ProfileLoader;
pub use scenario::ScenarioLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
