//! Scenario loader.

use std::collections::HashSet;
use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::scenario::ScenarioSpec;

/// Loader for simulated scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        let spec = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {}", path.display(), e))?;

        tracing::info!(
            scenario = %spec.name,
            guards = spec.guards.len(),
            rocks = spec.rocks.len(),
            miners = spec.miners.len(),
            "loaded scenario"
        );
        Ok(spec)
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        let spec: ScenarioSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        Self::validate(&spec)?;
        Ok(spec)
    }

    fn validate(spec: &ScenarioSpec) -> LoadResult<()> {
        for guard in &spec.guards {
            if guard.route.is_empty() {
                anyhow::bail!("guard '{}' has an empty route", guard.name);
            }
            if guard.step_ms == 0 {
                anyhow::bail!("guard '{}' has a zero step interval", guard.name);
            }
        }

        let mut ids = HashSet::new();
        let mut positions = HashSet::new();
        for (node, _) in spec.nodes() {
            if !ids.insert(node.id) {
                anyhow::bail!("duplicate rock id {}", node.id);
            }
            if !positions.insert(node.position) {
                anyhow::bail!("two rocks share position {}", node.position);
            }
        }

        if spec.worlds == 0 {
            anyhow::bail!("scenario needs at least one world");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bot_core::Position;

    use super::*;

    const MINE: &str = r#"(
        name: "mine",
        agent_start: (x: 10, y: 10),
        rocks: [
            (position: (x: 10, y: 12), respawn_ms: 22000),
            (position: (x: 12, y: 12), respawn_ms: 22000),
        ],
        miners: [(position: (x: 13, y: 12), world: 0)],
    )"#;

    #[test]
    fn parses_with_defaults() {
        let spec = ScenarioLoader::parse(MINE).expect("valid scenario");
        assert_eq!(spec.agent_start, Position::ground(10, 10));
        assert_eq!(spec.rocks.len(), 2);
        assert_eq!(spec.worlds, 2);
        assert!(spec.guards.is_empty());
        assert!(spec.view.is_none());
    }

    #[test]
    fn rejects_empty_guard_route() {
        let text = r#"(
            name: "bad",
            agent_start: (x: 0, y: 0),
            guards: [(name: "g", route: [], step_ms: 600)],
        )"#;
        let err = ScenarioLoader::parse(text).expect_err("empty route");
        assert!(err.to_string().contains("empty route"));
    }

    #[test]
    fn rejects_duplicate_rock_positions() {
        let text = r#"(
            name: "bad",
            agent_start: (x: 0, y: 0),
            rocks: [
                (position: (x: 1, y: 1), respawn_ms: 1000),
                (position: (x: 1, y: 1), respawn_ms: 1000),
            ],
        )"#;
        assert!(ScenarioLoader::parse(text).is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(MINE.as_bytes()).expect("write");
        let spec = ScenarioLoader::load(file.path()).expect("valid scenario");
        assert_eq!(spec.name, "mine");
    }
}
