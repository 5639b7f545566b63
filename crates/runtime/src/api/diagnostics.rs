//! Diagnostics exposed to reporting collaborators.
//!
//! The runtime publishes one [`Diagnostics`] snapshot per tick. Sinks decide
//! what to do with it: log it, keep the latest copy for a painter or webhook
//! to read, or drop it.

use std::sync::{Arc, PoisonError, RwLock};

use bot_core::DangerTier;
use serde::Serialize;

/// Coarse counters accumulated over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub idle_ticks: u64,
    pub retreats: u64,
    pub returns: u64,
    pub nodes_worked: u64,
    pub interaction_failures: u64,
    pub escalations: u64,
    pub relocations: u64,
    pub early_releases: u64,
    pub hazard_encounters: u64,
    pub hazard_escalations: u64,
    pub crowd_detections: u64,
}

/// Snapshot of the bot's state after a tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub tick: u64,
    pub current_task: Option<&'static str>,
    pub danger_tier: DangerTier,
    pub blacklisted: usize,
    pub counters: Counters,
    /// Set once a task ended the run.
    pub stop_reason: Option<String>,
}

pub trait DiagnosticsSink: Send {
    fn publish(&mut self, diagnostics: &Diagnostics);
}

/// Logs every snapshot at debug level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn publish(&mut self, d: &Diagnostics) {
        tracing::debug!(
            tick = d.tick,
            task = d.current_task.unwrap_or("idle"),
            tier = %d.danger_tier,
            blacklisted = d.blacklisted,
            worked = d.counters.nodes_worked,
            retreats = d.counters.retreats,
            "tick"
        );
    }
}

/// Discards every snapshot.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn publish(&mut self, _: &Diagnostics) {}
}

/// Keeps the latest snapshot for readers on other threads.
#[derive(Clone, Debug, Default)]
pub struct SharedDiagnostics {
    latest: Arc<RwLock<Diagnostics>>,
}

impl SharedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the most recently published snapshot.
    pub fn latest(&self) -> Diagnostics {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticsSink for SharedDiagnostics {
    fn publish(&mut self, diagnostics: &Diagnostics) {
        let mut latest = self
            .latest
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        latest.clone_from(diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_sink_exposes_latest_snapshot() {
        let reader = SharedDiagnostics::new();
        let mut writer = reader.clone();

        writer.publish(&Diagnostics {
            tick: 3,
            current_task: Some("mine"),
            ..Diagnostics::default()
        });

        let latest = reader.latest();
        assert_eq!(latest.tick, 3);
        assert_eq!(latest.current_task, Some("mine"));
    }

    #[test]
    fn snapshot_serializes_for_webhooks() {
        let json = serde_json::to_value(Diagnostics {
            danger_tier: DangerTier::EarlyWarning,
            ..Diagnostics::default()
        })
        .expect("serializable");
        assert_eq!(json["danger_tier"], "EarlyWarning");
        assert_eq!(json["counters"]["retreats"], 0);
    }
}
