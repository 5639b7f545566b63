//! Bot profile loader.

use std::path::Path;

use bot_core::BotProfile;

use crate::loaders::{LoadResult, read_file};

/// Loader for bot profiles from TOML files.
pub struct ProfileLoader;

impl ProfileLoader {
    /// Load and validate a profile from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BotProfile> {
        let content = read_file(path)?;
        let profile = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid profile {}: {}", path.display(), e))?;

        tracing::info!(
            profile = %profile.name,
            action = %profile.action,
            lanes = profile.hazard.lanes.len(),
            "loaded bot profile"
        );
        Ok(profile)
    }

    /// Parse and validate a profile from TOML text.
    ///
    /// Unknown action or landmark labels fail here, as does any
    /// [`bot_core::ConfigError`].
    pub fn parse(content: &str) -> LoadResult<BotProfile> {
        let profile: BotProfile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse profile TOML: {}", e))?;
        profile.validate()?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bot_core::{ActionKind, ConfigError, Landmark, Position};

    use super::*;

    const STALL: &str = r#"
        name = "stall"
        action = "steal"

        [landmarks]
        safety = { x = 1867, y = 3299 }
        work_spot = { x = 1867, y = 3298 }

        [[hazard.lanes]]
        name = "guard"
        approach = [{ x = 1865, y = 3295 }]
        strike = [{ x = 1866, y = 3295 }, { x = 1867, y = 3295 }]
    "#;

    #[test]
    fn parses_minimal_profile_with_defaults() {
        let profile = ProfileLoader::parse(STALL).expect("valid profile");
        assert_eq!(profile.action, ActionKind::Steal);
        assert_eq!(
            profile.position(Landmark::Safety),
            Some(Position::ground(1867, 3299))
        );
        assert_eq!(profile.hazard.delay.mean_ms, 3_200.0);
        assert_eq!(profile.blacklist.expiry_ms, 22_000);
        assert_eq!(profile.retry.setup_attempts, 3);
        assert!(profile.hazard.lanes[0].clearance.is_empty());
    }

    #[test]
    fn unknown_action_is_a_load_error() {
        let text = STALL.replace("\"steal\"", "\"pickpocket\"");
        assert!(ProfileLoader::parse(&text).is_err());
    }

    #[test]
    fn unknown_landmark_is_a_load_error() {
        let text = STALL.replace("work_spot =", "lobby =");
        assert!(ProfileLoader::parse(&text).is_err());
    }

    #[test]
    fn validation_errors_surface_as_config_errors() {
        let text = format!("{STALL}\n[blacklist]\nexpiry_ms = 0\n");
        let err = ProfileLoader::parse(&text).expect_err("zero expiry");
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::ZeroExpiry));
    }

    #[test]
    fn load_reports_path_on_failure() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "name = 3").expect("write");

        let err = ProfileLoader::load(file.path()).expect_err("bad profile");
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(STALL.as_bytes()).expect("write");

        let profile = ProfileLoader::load(file.path()).expect("valid profile");
        assert_eq!(profile.name, "stall");
    }
}
