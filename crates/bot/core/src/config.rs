//! Bot profile: everything an activity needs, validated once at load time.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::action::{ActionKind, Landmark};
use crate::blacklist::BlacklistConfig;
use crate::crowd::CrowdConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::geometry::{Area, Position};
use crate::hazard::{HazardConfig, PatrolLane};
use crate::random::{ReactionDelay, UniformDelay};

/// Give up when no node was worked for this long.
pub const DEFAULT_STUCK_TIMEOUT_MS: u64 = 5 * 60 * 1_000;

/// Bounded retry budgets used by tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    /// Attempts to obtain a self position before setup fails.
    pub setup_attempts: u32,
    /// Consecutive failed interactions before re-walking to the work area.
    pub interaction_failures: u32,
    /// Bounded wait for an interaction to finish.
    pub interaction_timeout_ms: u64,
    /// Bounded wait for a walk to arrive.
    pub walk_timeout_ms: u64,
}

impl RetryConfig {
    pub fn interaction_timeout(&self) -> Duration {
        Duration::from_millis(self.interaction_timeout_ms)
    }

    pub fn walk_timeout(&self) -> Duration {
        Duration::from_millis(self.walk_timeout_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            setup_attempts: 3,
            interaction_failures: 5,
            interaction_timeout_ms: 6_000,
            walk_timeout_ms: 10_000,
        }
    }
}

/// A landmark is either one tile or a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Site {
    Tile(Position),
    Area(Area),
}

impl Site {
    /// The tile itself, or the center of the area.
    pub fn anchor(&self) -> Position {
        match self {
            Self::Tile(pos) => *pos,
            Self::Area(area) => area.center(),
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        match self {
            Self::Tile(tile) => *tile == pos,
            Self::Area(area) => area.contains(pos),
        }
    }
}

/// Activity description handed to the runtime.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotProfile {
    pub name: String,
    pub action: ActionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub landmarks: BTreeMap<Landmark, Site>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hazard: HazardConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub blacklist: BlacklistConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crowd: CrowdConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub retry: RetryConfig,
    #[cfg_attr(feature = "serde", serde(default = "default_stuck_timeout_ms"))]
    pub stuck_timeout_ms: u64,
}

#[cfg(feature = "serde")]
fn default_stuck_timeout_ms() -> u64 {
    DEFAULT_STUCK_TIMEOUT_MS
}

impl BotProfile {
    pub fn new(name: impl Into<String>, action: ActionKind) -> Self {
        Self {
            name: name.into(),
            action,
            landmarks: BTreeMap::new(),
            hazard: HazardConfig::default(),
            blacklist: BlacklistConfig::default(),
            crowd: CrowdConfig::default(),
            retry: RetryConfig::default(),
            stuck_timeout_ms: DEFAULT_STUCK_TIMEOUT_MS,
        }
    }

    pub fn with_landmark(mut self, landmark: Landmark, site: Site) -> Self {
        self.landmarks.insert(landmark, site);
        self
    }

    pub fn with_lane(mut self, lane: PatrolLane) -> Self {
        self.hazard.lanes.push(lane);
        self
    }

    pub fn stuck_timeout(&self) -> Duration {
        Duration::from_millis(self.stuck_timeout_ms)
    }

    pub fn site(&self, landmark: Landmark) -> Option<Site> {
        self.landmarks.get(&landmark).copied()
    }

    /// Tile of a landmark, or the center of an area landmark.
    pub fn position(&self, landmark: Landmark) -> Option<Position> {
        self.site(landmark).map(|site| site.anchor())
    }

    pub fn area(&self, landmark: Landmark) -> Option<Area> {
        match self.site(landmark)? {
            Site::Area(area) => Some(area),
            Site::Tile(_) => None,
        }
    }

    /// Landmarks the configured activity cannot run without.
    pub fn required_landmarks(&self) -> Vec<Landmark> {
        let mut required = Vec::new();
        if self.hazard.is_enabled() {
            required.extend([Landmark::Safety, Landmark::WorkSpot]);
        }
        match self.action {
            ActionKind::Mine | ActionKind::Chop => required.push(Landmark::WorkArea),
            ActionKind::Steal | ActionKind::Cook | ActionKind::Craft => {
                required.push(Landmark::WorkSpot)
            }
            ActionKind::Bank | ActionKind::Deposit => required.push(Landmark::Bank),
            ActionKind::Alch | ActionKind::Teleport | ActionKind::WalkHere => {}
        }
        required.sort();
        required.dedup();
        required
    }

    /// Checks every invariant the runtime relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_delay(&self.hazard.delay)?;
        for lane in &self.hazard.lanes {
            validate_lane(lane)?;
        }

        if self.blacklist.expiry_ms == 0 {
            return Err(ConfigError::ZeroExpiry);
        }

        validate_range("crowd dwell", self.crowd.dwell)?;
        validate_range("hop cooldown", self.crowd.hop_cooldown)?;
        if self.crowd.clear_readings == 0 {
            return Err(ConfigError::ZeroRetryBudget("crowd.clear_readings"));
        }

        if self.retry.setup_attempts == 0 {
            return Err(ConfigError::ZeroRetryBudget("retry.setup_attempts"));
        }
        if self.retry.interaction_failures == 0 {
            return Err(ConfigError::ZeroRetryBudget("retry.interaction_failures"));
        }

        for landmark in self.required_landmarks() {
            if !self.landmarks.contains_key(&landmark) {
                return Err(ConfigError::MissingLandmark {
                    landmark,
                    action: self.action,
                });
            }
        }

        for (landmark, site) in &self.landmarks {
            match (landmark, site) {
                (Landmark::Safety | Landmark::WorkSpot, Site::Area(_)) => {
                    return Err(ConfigError::ExpectedTile(*landmark));
                }
                (Landmark::WorkArea, Site::Tile(_)) => {
                    return Err(ConfigError::ExpectedArea(*landmark));
                }
                (_, Site::Area(area)) if !area.is_well_formed() => {
                    return Err(ConfigError::MalformedArea(*landmark));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn validate_delay(delay: &ReactionDelay) -> ConfigResult<()> {
    if delay.min_ms > delay.max_ms {
        return Err(ConfigError::InvertedRange {
            what: "reaction delay",
            min_ms: delay.min_ms,
            max_ms: delay.max_ms,
        });
    }
    if !delay.mean_ms.is_finite() {
        return Err(ConfigError::InvalidMean(delay.mean_ms));
    }
    if delay.std_dev_ms.is_nan() || delay.std_dev_ms < 0.0 {
        return Err(ConfigError::InvalidStdDev(delay.std_dev_ms));
    }
    Ok(())
}

fn validate_range(what: &'static str, range: UniformDelay) -> ConfigResult<()> {
    if range.min_ms > range.max_ms {
        return Err(ConfigError::InvertedRange {
            what,
            min_ms: range.min_ms,
            max_ms: range.max_ms,
        });
    }
    Ok(())
}

fn validate_lane(lane: &PatrolLane) -> ConfigResult<()> {
    if lane.strike.is_empty() {
        return Err(ConfigError::LaneWithoutStrike {
            lane: lane.name.clone(),
        });
    }
    let mut planes = lane.cells().map(|cell| cell.plane);
    if let Some(first) = planes.next()
        && planes.any(|plane| plane != first)
    {
        return Err(ConfigError::LaneSpansPlanes {
            lane: lane.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stall_profile() -> BotProfile {
        BotProfile::new("cannonball", ActionKind::Steal)
            .with_landmark(Landmark::Safety, Site::Tile(Position::ground(1867, 3299)))
            .with_landmark(Landmark::WorkSpot, Site::Tile(Position::ground(1867, 3295)))
            .with_lane(PatrolLane::new(
                "stall",
                vec![Position::ground(1865, 3295)],
                vec![Position::ground(1866, 3295)],
            ))
    }

    #[test]
    fn valid_profile_passes() {
        assert_eq!(stall_profile().validate(), Ok(()));
    }

    #[test]
    fn inverted_delay_is_rejected() {
        let mut profile = stall_profile();
        profile.hazard.delay.min_ms = 4_000;
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::InvertedRange { what: "reaction delay", .. })
        ));
    }

    #[test]
    fn negative_std_dev_is_rejected() {
        let mut profile = stall_profile();
        profile.hazard.delay.std_dev_ms = -1.0;
        assert_eq!(profile.validate(), Err(ConfigError::InvalidStdDev(-1.0)));
    }

    #[test]
    fn lane_rules() {
        let mut profile = stall_profile();
        profile.hazard.lanes[0].strike.clear();
        assert!(matches!(profile.validate(), Err(ConfigError::LaneWithoutStrike { .. })));

        let mut profile = stall_profile();
        profile.hazard.lanes[0].strike.push(Position::new(1867, 3295, 1));
        assert!(matches!(profile.validate(), Err(ConfigError::LaneSpansPlanes { .. })));
    }

    #[test]
    fn hazard_lanes_require_a_safety_tile() {
        let mut profile = stall_profile();
        profile.landmarks.remove(&Landmark::Safety);
        assert_eq!(
            profile.validate(),
            Err(ConfigError::MissingLandmark {
                landmark: Landmark::Safety,
                action: ActionKind::Steal,
            })
        );
    }

    #[test]
    fn mining_requires_work_area() {
        let profile = BotProfile::new("gems", ActionKind::Mine);
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::MissingLandmark { landmark: Landmark::WorkArea, .. })
        ));

        let profile = profile.with_landmark(
            Landmark::WorkArea,
            Site::Area(Area::from_corners(Position::ground(0, 0), Position::ground(9, 9))),
        );
        assert_eq!(profile.validate(), Ok(()));
        assert_eq!(profile.position(Landmark::WorkArea), Some(Position::ground(4, 4)));
    }

    #[test]
    fn zero_budgets_are_rejected() {
        let mut profile = stall_profile();
        profile.blacklist.expiry_ms = 0;
        assert_eq!(profile.validate(), Err(ConfigError::ZeroExpiry));

        let mut profile = stall_profile();
        profile.retry.interaction_failures = 0;
        assert_eq!(
            profile.validate(),
            Err(ConfigError::ZeroRetryBudget("retry.interaction_failures"))
        );
    }
}
