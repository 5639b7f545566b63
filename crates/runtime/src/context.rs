//! Per-run blackboard shared by all tasks.
//!
//! [`BotContext`] owns the environment, the clock, every stateful tracker and
//! the per-tick [`Perception`] snapshot. Tasks receive it by reference from
//! the scheduler; nothing is reachable through globals.
//!
//! # Tick phases
//!
//! 1. [`BotContext::begin_tick`] captures perception and feeds the hazard
//!    tracker and crowd monitor. This is the only place those trackers
//!    observe the world; an unreadable input skips the update.
//! 2. Task predicates read the snapshot and trackers through `&BotContext`.
//! 3. The selected task mutates the context through `&mut BotContext`.

use std::sync::Arc;
use std::time::Duration;

use bot_core::{
    BotProfile, Clock, ConfigError, CrowdMonitor, HazardTracker, Landmark, Position,
    ResourceBlacklist, TargetSelector, Timer, Timestamp, entropy_rng, seeded_rng,
};

use crate::api::{Counters, Diagnostics, Environment, Perception, StopReason};

pub struct BotContext {
    pub(crate) env: Box<dyn Environment>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) profile: BotProfile,
    pub(crate) hazard: HazardTracker,
    pub(crate) blacklist: ResourceBlacklist,
    pub(crate) crowd: CrowdMonitor,
    pub(crate) selector: TargetSelector,
    pub(crate) perception: Perception,
    pub(crate) counters: Counters,
    /// Location of the last node worked, preferred by the next selection.
    pub(crate) target_hint: Option<Position>,
    /// Reset whenever a node is successfully worked.
    pub(crate) progress: Timer,
    pub(crate) next_hop_at: Timestamp,
    pub(crate) setup_complete: bool,
    current_task: Option<&'static str>,
    stop: Option<StopReason>,
    tick: u64,
}

impl BotContext {
    /// Builds a context around a validated profile.
    ///
    /// `seed` makes every random draw reproducible; `None` seeds from the OS.
    pub fn new(
        profile: BotProfile,
        env: Box<dyn Environment>,
        clock: Arc<dyn Clock>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        profile.validate()?;

        let (hazard_rng, crowd_rng) = match seed {
            Some(seed) => (seeded_rng(seed), seeded_rng(seed.wrapping_add(1))),
            None => (entropy_rng(), entropy_rng()),
        };

        let now = clock.now();
        Ok(Self {
            hazard: HazardTracker::new(profile.hazard.clone(), hazard_rng),
            blacklist: ResourceBlacklist::from_config(&profile.blacklist),
            crowd: CrowdMonitor::new(profile.crowd, profile.area(Landmark::WorkArea), crowd_rng),
            selector: TargetSelector::new(),
            perception: Perception {
                at: now,
                ..Perception::default()
            },
            counters: Counters::default(),
            target_hint: None,
            progress: Timer::started_at(now),
            next_hop_at: now,
            setup_complete: false,
            current_task: None,
            stop: None,
            tick: 0,
            env,
            clock,
            profile,
        })
    }

    /// Sensing phase: snapshot perception and update the trackers.
    ///
    /// A tracker whose input could not be read this tick is left untouched,
    /// so the hazard tracker holds its last known tier (and a running
    /// early-warning timer keeps counting) until threats are readable again.
    pub fn begin_tick(&mut self) {
        self.tick += 1;
        self.current_task = None;
        let now = self.clock.now();
        self.perception = Perception::capture(self.env.as_source(), self.tick, now);

        if let Some(threats) = &self.perception.threats {
            self.hazard.observe(threats, now);
        }
        if let Some(others) = &self.perception.other_agents {
            self.crowd.observe(others, now);
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Snapshot taken at the start of this tick.
    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    pub fn hazard(&self) -> &HazardTracker {
        &self.hazard
    }

    pub fn hazard_mut(&mut self) -> &mut HazardTracker {
        &mut self.hazard
    }

    pub fn blacklist(&self) -> &ResourceBlacklist {
        &self.blacklist
    }

    pub fn blacklist_mut(&mut self) -> &mut ResourceBlacklist {
        &mut self.blacklist
    }

    pub fn crowd(&self) -> &CrowdMonitor {
        &self.crowd
    }

    pub fn env_mut(&mut self) -> &mut dyn Environment {
        self.env.as_mut()
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    pub fn target_hint(&self) -> Option<Position> {
        self.target_hint
    }

    /// Position of a landmark from the profile.
    pub fn landmark(&self, landmark: Landmark) -> Option<Position> {
        self.profile.position(landmark)
    }

    /// True when this tick's snapshot puts the agent on `landmark`.
    pub fn is_at(&self, landmark: Landmark) -> bool {
        self.landmark(landmark)
            .is_some_and(|pos| self.perception.is_at(pos))
    }

    /// Danger as of this tick's snapshot time.
    pub fn in_danger(&self) -> bool {
        self.hazard.is_dangerous(self.perception.at)
    }

    /// Records a terminal precondition failure. The first reason wins.
    pub fn request_stop(&mut self, reason: StopReason) {
        if self.stop.is_none() {
            tracing::error!(%reason, "stopping run");
            self.stop = Some(reason);
        }
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop.as_ref()
    }

    pub fn current_task(&self) -> Option<&'static str> {
        self.current_task
    }

    pub(crate) fn set_current_task(&mut self, task: Option<&'static str>) {
        self.current_task = task;
    }

    /// Marks that a node was worked now.
    pub(crate) fn mark_progress(&mut self) {
        self.progress.reset(self.clock.now());
    }

    pub(crate) fn idle_for(&self) -> Duration {
        self.progress.elapsed(self.clock.now())
    }

    /// Builds the diagnostics snapshot for this tick.
    pub fn diagnostics(&self) -> Diagnostics {
        let mut counters = self.counters;
        counters.hazard_encounters = self.hazard.encounters();
        counters.hazard_escalations = self.hazard.escalations();
        counters.crowd_detections = self.crowd.detections();

        Diagnostics {
            tick: self.tick,
            current_task: self.current_task,
            danger_tier: self.hazard.tier(),
            blacklisted: self.blacklist.live_count(self.clock.now()),
            counters,
            stop_reason: self.stop.as_ref().map(ToString::to_string),
        }
    }
}

impl std::fmt::Debug for BotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotContext")
            .field("tick", &self.tick)
            .field("profile", &self.profile.name)
            .field("perception", &self.perception)
            .field("hazard", &self.hazard)
            .field("crowd", &self.crowd)
            .field("stop", &self.stop)
            .finish_non_exhaustive()
    }
}
