//! Detection of other agents lingering in the work area.

use std::time::Duration;

use tracing::{debug, info};

use crate::geometry::{Area, Position};
use crate::random::{BoxedRng, UniformDelay};
use crate::time::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CrowdConfig {
    /// How long someone may stay in the area before it counts as crowded.
    pub dwell: UniformDelay,
    /// Consecutive empty readings needed to forget a lingering agent.
    pub clear_readings: u32,
    /// Detection is suppressed for this long after a relocation.
    pub grace_ms: u64,
    /// Minimum spacing between two relocations.
    pub hop_cooldown: UniformDelay,
}

impl CrowdConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            dwell: UniformDelay::new(10_000, 16_000),
            clear_readings: 10,
            grace_ms: 10_000,
            hop_cooldown: UniformDelay::new(7_000, 10_000),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Dwell {
    since: Timestamp,
    threshold: Duration,
}

/// Watches one area for other agents staying too long.
pub struct CrowdMonitor {
    config: CrowdConfig,
    area: Option<Area>,
    rng: BoxedRng,
    dwell: Option<Dwell>,
    clear_streak: u32,
    grace_until: Option<Timestamp>,
    crowded: bool,
    detections: u64,
}

impl CrowdMonitor {
    /// A monitor without an area never reports crowding.
    pub fn new(config: CrowdConfig, area: Option<Area>, rng: BoxedRng) -> Self {
        Self {
            config,
            area,
            rng,
            dwell: None,
            clear_streak: 0,
            grace_until: None,
            crowded: false,
            detections: 0,
        }
    }

    pub fn config(&self) -> &CrowdConfig {
        &self.config
    }

    pub fn area(&self) -> Option<Area> {
        self.area
    }

    /// Feeds this tick's other-agent positions. Returns the crowded flag.
    pub fn observe(&mut self, others: &[Position], now: Timestamp) -> bool {
        let Some(area) = self.area else {
            return false;
        };
        if self.grace_until.is_some_and(|until| now < until) {
            return false;
        }

        let present = others.iter().filter(|p| area.contains(**p)).count();
        if present == 0 {
            self.clear_streak += 1;
            if self.dwell.is_some() && self.clear_streak >= self.config.clear_readings {
                debug!(readings = self.clear_streak, "area clear, dwell tracking reset");
                self.dwell = None;
                self.crowded = false;
            }
            return self.crowded;
        }

        self.clear_streak = 0;
        let dwell = match self.dwell {
            Some(dwell) => dwell,
            None => {
                let threshold = self.config.dwell.sample(&mut self.rng);
                debug!(
                    present,
                    threshold_secs = threshold.as_secs_f64(),
                    "agent entered work area"
                );
                let dwell = Dwell {
                    since: now,
                    threshold,
                };
                self.dwell = Some(dwell);
                dwell
            }
        };

        if !self.crowded && now.elapsed_since(dwell.since) >= dwell.threshold {
            self.crowded = true;
            self.detections += 1;
            info!(
                present,
                lingered_secs = now.elapsed_since(dwell.since).as_secs_f64(),
                "work area crowded"
            );
        }
        self.crowded
    }

    pub fn is_crowded(&self) -> bool {
        self.crowded
    }

    /// Forgets all tracking and starts the post-relocation grace period.
    pub fn reset_after_relocation(&mut self, now: Timestamp) {
        self.dwell = None;
        self.clear_streak = 0;
        self.crowded = false;
        self.grace_until = Some(now + self.config.grace());
    }

    /// Draws the next relocation cooldown.
    pub fn next_hop_cooldown(&mut self) -> Duration {
        self.config.hop_cooldown.sample(&mut self.rng)
    }

    pub fn detections(&self) -> u64 {
        self.detections
    }
}

impl std::fmt::Debug for CrowdMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrowdMonitor")
            .field("area", &self.area)
            .field("dwell", &self.dwell)
            .field("clear_streak", &self.clear_streak)
            .field("crowded", &self.crowded)
            .finish_non_exhaustive()
    }
}
