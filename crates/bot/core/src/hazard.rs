//! Danger-zone classification for patrolling threats.
//!
//! A [`HazardTracker`] watches one or more fixed patrol lanes. Each lane is a
//! set of discrete cells split into *approach* cells (the threat is coming)
//! and *strike* cells (the threat is on top of the agent). Classification is
//! pure cell membership on exact grid coordinates; distances never matter.
//!
//! # Reaction delay
//!
//! Entering the early-warning tier does not trigger a retreat immediately.
//! Instead a delay is drawn from a clamped normal distribution and danger is
//! only reported once the threat has stayed in the approach cells for that
//! long. A threat reaching a strike cell is reported at once.
//!
//! # Asymmetry
//!
//! [`HazardTracker::is_dangerous`] is easy to trigger while
//! [`HazardTracker::is_safe_to_resume`] is strict: it requires the whole
//! clearance range of every lane to be empty.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::geometry::Position;
use crate::random::{BoxedRng, ReactionDelay};
use crate::time::{Timer, Timestamp};

/// Hazard classification of the current tick.
///
/// Ordered by severity so the overall tier over several lanes is the maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DangerTier {
    /// No threat in any approach or strike cell.
    #[default]
    Safe,
    /// A threat stands on an approach cell but no strike cell.
    EarlyWarning,
    /// A threat stands on a strike cell.
    ImmediateDanger,
}

impl DangerTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::EarlyWarning => "early-warning",
            Self::ImmediateDanger => "immediate-danger",
        }
    }
}

impl fmt::Display for DangerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed path walked by a threat, split into tiers of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatrolLane {
    pub name: String,
    /// Cells where a threat is approaching.
    pub approach: Vec<Position>,
    /// Cells where a threat can catch the agent.
    pub strike: Vec<Position>,
    /// Extra cells that must also be empty before work may resume.
    ///
    /// Approach and strike cells are always part of the clearance range.
    #[cfg_attr(feature = "serde", serde(default))]
    pub clearance: Vec<Position>,
}

impl PatrolLane {
    pub fn new(name: impl Into<String>, approach: Vec<Position>, strike: Vec<Position>) -> Self {
        Self {
            name: name.into(),
            approach,
            strike,
            clearance: Vec::new(),
        }
    }

    pub fn with_clearance(mut self, clearance: Vec<Position>) -> Self {
        self.clearance = clearance;
        self
    }

    /// Classifies this tick's threat positions against this lane.
    pub fn classify(&self, threats: &[Position]) -> DangerTier {
        let mut tier = DangerTier::Safe;
        for threat in threats {
            if self.strike.contains(threat) {
                return DangerTier::ImmediateDanger;
            }
            if self.approach.contains(threat) {
                tier = DangerTier::EarlyWarning;
            }
        }
        tier
    }

    /// True if any threat occupies any cell of the extended range.
    pub fn is_occupied(&self, threats: &[Position]) -> bool {
        threats.iter().any(|t| {
            self.strike.contains(t) || self.approach.contains(t) || self.clearance.contains(t)
        })
    }

    /// Every cell of the lane, strike cells first.
    pub fn cells(&self) -> impl Iterator<Item = &Position> {
        self.strike
            .iter()
            .chain(self.approach.iter())
            .chain(self.clearance.iter())
    }
}

/// Configuration for a [`HazardTracker`].
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HazardConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub lanes: Vec<PatrolLane>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delay: ReactionDelay,
}

impl HazardConfig {
    pub fn is_enabled(&self) -> bool {
        !self.lanes.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct EarlyWarning {
    timer: Timer,
    delay: Duration,
    escalated: bool,
}

/// Danger-tier state machine with a randomized reaction delay.
///
/// Only [`observe`](Self::observe) and
/// [`is_safe_to_resume`](Self::is_safe_to_resume) mutate the tracker; the
/// remaining queries are read-only so they can back task predicates.
pub struct HazardTracker {
    config: HazardConfig,
    rng: BoxedRng,
    tier: DangerTier,
    early_warning: Option<EarlyWarning>,
    encounters: u64,
    escalations: u64,
}

impl HazardTracker {
    pub fn new(config: HazardConfig, rng: BoxedRng) -> Self {
        Self {
            config,
            rng,
            tier: DangerTier::Safe,
            early_warning: None,
            encounters: 0,
            escalations: 0,
        }
    }

    pub fn config(&self) -> &HazardConfig {
        &self.config
    }

    /// Pure classification of a set of threat positions over all lanes.
    pub fn classify(&self, threats: &[Position]) -> DangerTier {
        self.config
            .lanes
            .iter()
            .map(|lane| lane.classify(threats))
            .max()
            .unwrap_or(DangerTier::Safe)
    }

    /// Feeds this tick's threat positions into the state machine.
    ///
    /// Call once per tick, before any predicate reads the tracker.
    pub fn observe(&mut self, threats: &[Position], now: Timestamp) -> DangerTier {
        let tier = self.classify(threats);

        match tier {
            DangerTier::Safe => {
                if self.early_warning.take().is_some() {
                    debug!("hazard cleared, early-warning timer reset");
                }
            }
            DangerTier::ImmediateDanger => {
                if self.tier != DangerTier::ImmediateDanger {
                    info!(?threats, "immediate danger: threat on a strike cell");
                }
                self.early_warning = None;
            }
            DangerTier::EarlyWarning => {
                let delay_config = &self.config.delay;
                let rng = &mut self.rng;
                let encounters = &mut self.encounters;
                let warning = self.early_warning.get_or_insert_with(|| {
                    let delay = delay_config.sample(rng);
                    *encounters += 1;
                    info!(
                        delay_secs = delay.as_secs_f64(),
                        "early warning: threat approaching, reaction timer started"
                    );
                    EarlyWarning {
                        timer: Timer::started_at(now),
                        delay,
                        escalated: false,
                    }
                });

                let elapsed = warning.timer.elapsed(now);
                if !warning.escalated && elapsed >= warning.delay {
                    warning.escalated = true;
                    self.escalations += 1;
                    info!(
                        elapsed_secs = elapsed.as_secs_f64(),
                        "early warning expired, treating as danger"
                    );
                }
            }
        }

        self.tier = tier;
        tier
    }

    /// True if the agent must retreat now.
    ///
    /// Reads the state left by the last [`observe`](Self::observe).
    pub fn is_dangerous(&self, now: Timestamp) -> bool {
        match self.tier {
            DangerTier::Safe => false,
            DangerTier::ImmediateDanger => true,
            DangerTier::EarlyWarning => self
                .early_warning
                .is_some_and(|w| w.timer.has_elapsed(now, w.delay)),
        }
    }

    /// Strict resume check without side effects.
    ///
    /// True only when no threat occupies any cell of any lane's extended range.
    pub fn is_clear(&self, threats: &[Position]) -> bool {
        !self.config.lanes.iter().any(|lane| lane.is_occupied(threats))
    }

    /// Strict resume check that also resets the early-warning timer.
    pub fn is_safe_to_resume(&mut self, threats: &[Position]) -> bool {
        if !self.is_clear(threats) {
            debug!("not safe to resume, lane still occupied");
            return false;
        }
        self.early_warning = None;
        true
    }

    /// Tier recorded by the last observation.
    pub fn tier(&self) -> DangerTier {
        self.tier
    }

    /// Delay drawn for the pending early warning, if a timer is running.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.early_warning.map(|w| w.delay)
    }

    /// Time spent in the current early warning, if a timer is running.
    pub fn early_warning_elapsed(&self, now: Timestamp) -> Option<Duration> {
        self.early_warning.map(|w| w.timer.elapsed(now))
    }

    /// Number of early-warning timers started so far.
    pub fn encounters(&self) -> u64 {
        self.encounters
    }

    /// Number of early warnings that escalated into danger.
    pub fn escalations(&self) -> u64 {
        self.escalations
    }
}

impl fmt::Debug for HazardTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HazardTracker")
            .field("tier", &self.tier)
            .field("early_warning", &self.early_warning)
            .field("encounters", &self.encounters)
            .field("escalations", &self.escalations)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded_rng;

    const PATROL_Y: i32 = 3295;

    fn stall_lane() -> PatrolLane {
        PatrolLane::new(
            "stall",
            vec![Position::ground(1865, PATROL_Y)],
            vec![Position::ground(1866, PATROL_Y), Position::ground(1867, PATROL_Y)],
        )
        .with_clearance(vec![Position::ground(1864, PATROL_Y)])
    }

    fn tracker(seed: u64) -> HazardTracker {
        HazardTracker::new(
            HazardConfig {
                lanes: vec![stall_lane()],
                delay: ReactionDelay::GUARD_EARLY_WARNING,
            },
            seeded_rng(seed),
        )
    }

    fn ms(v: u64) -> Timestamp {
        Timestamp(v)
    }

    #[test]
    fn safe_ticks_never_start_a_timer() {
        let mut tracker = tracker(1);
        for t in (0..20_000).step_by(600) {
            assert_eq!(tracker.observe(&[], ms(t)), DangerTier::Safe);
            assert!(!tracker.is_dangerous(ms(t)));
            assert!(tracker.pending_delay().is_none());
        }
        assert_eq!(tracker.encounters(), 0);
    }

    #[test]
    fn threat_off_the_lane_or_plane_is_ignored() {
        let mut tracker = tracker(1);
        let threats = [
            Position::new(1866, PATROL_Y, 1),
            Position::ground(1866, PATROL_Y + 1),
        ];
        assert_eq!(tracker.observe(&threats, ms(0)), DangerTier::Safe);
        assert!(tracker.is_clear(&threats));
    }

    #[test]
    fn early_warning_respects_delay_bounds() {
        let approach = [Position::ground(1865, PATROL_Y)];

        for seed in 0..50 {
            let mut tracker = tracker(seed);
            let start = 10_000;
            tracker.observe(&approach, ms(start));
            let delay = tracker.pending_delay().expect("timer started");

            // Below the configured minimum: never dangerous
            for elapsed in (0..2_500).step_by(100) {
                tracker.observe(&approach, ms(start + elapsed));
                assert!(!tracker.is_dangerous(ms(start + elapsed)));
            }

            // Between the bounds: decided by the single draw
            for elapsed in (2_500..3_500).step_by(50) {
                tracker.observe(&approach, ms(start + elapsed));
                let expected = Duration::from_millis(elapsed) >= delay;
                assert_eq!(tracker.is_dangerous(ms(start + elapsed)), expected);
            }

            // At or past the configured maximum: always dangerous
            tracker.observe(&approach, ms(start + 3_500));
            assert!(tracker.is_dangerous(ms(start + 3_500)));
            assert_eq!(tracker.encounters(), 1);
        }
    }

    #[test]
    fn delay_is_drawn_once_per_encounter() {
        let approach = [Position::ground(1865, PATROL_Y)];
        let mut tracker = tracker(9);

        tracker.observe(&approach, ms(0));
        let first = tracker.pending_delay();
        tracker.observe(&approach, ms(600));
        assert_eq!(tracker.pending_delay(), first);

        // Leaving the lane clears the timer; the next entry draws again
        tracker.observe(&[], ms(1_200));
        assert!(tracker.pending_delay().is_none());
        tracker.observe(&approach, ms(1_800));
        assert_eq!(tracker.encounters(), 2);
        assert_eq!(tracker.early_warning_elapsed(ms(2_000)), Some(Duration::from_millis(200)));
    }

    #[test]
    fn strike_cell_is_immediately_dangerous() {
        let mut tracker = tracker(3);
        tracker.observe(&[Position::ground(1865, PATROL_Y)], ms(0));
        assert!(tracker.pending_delay().is_some());

        let tier = tracker.observe(&[Position::ground(1866, PATROL_Y)], ms(1));
        assert_eq!(tier, DangerTier::ImmediateDanger);
        assert!(tracker.is_dangerous(ms(1)));
        assert!(tracker.pending_delay().is_none());
    }

    #[test]
    fn resume_requires_whole_clearance_range_empty() {
        let mut tracker = tracker(5);
        tracker.observe(&[Position::ground(1865, PATROL_Y)], ms(0));

        // Clearance-only cell: not a danger tier, but not safe to resume either
        let lingering = [Position::ground(1864, PATROL_Y)];
        assert_eq!(tracker.classify(&lingering), DangerTier::Safe);
        assert!(!tracker.is_safe_to_resume(&lingering));
        assert!(tracker.pending_delay().is_some());

        let gone = [Position::ground(1870, PATROL_Y)];
        assert!(tracker.is_safe_to_resume(&gone));
        assert!(tracker.pending_delay().is_none());
    }

    #[test]
    fn worst_lane_wins() {
        let other = PatrolLane::new(
            "ore",
            vec![Position::ground(1863, 3293)],
            vec![Position::ground(1863, 3292)],
        );
        let mut tracker = HazardTracker::new(
            HazardConfig {
                lanes: vec![stall_lane(), other],
                delay: ReactionDelay::GUARD_EARLY_WARNING,
            },
            seeded_rng(0),
        );

        let threats = [Position::ground(1865, PATROL_Y), Position::ground(1863, 3292)];
        assert_eq!(tracker.observe(&threats, ms(0)), DangerTier::ImmediateDanger);
    }
}
