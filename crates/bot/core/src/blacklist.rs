//! Time-windowed blacklist of recently worked resource locations.
//!
//! An entry suppresses re-selection of a location until the expiry window has
//! passed. Entries are compared against the caller's `now`; expired entries
//! are treated as absent immediately and physically removed the next time
//! [`ResourceBlacklist::prune`] runs.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info};

use crate::geometry::Position;
use crate::resource::RespawnSignal;
use crate::time::Timestamp;

/// Default window approximating a rock's respawn/contention time.
pub const DEFAULT_BLACKLIST_EXPIRY: Duration = Duration::from_millis(22_000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlacklistConfig {
    pub expiry_ms: u64,
}

impl BlacklistConfig {
    pub fn expiry(&self) -> Duration {
        Duration::from_millis(self.expiry_ms)
    }
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            expiry_ms: DEFAULT_BLACKLIST_EXPIRY.as_millis() as u64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    claimed_at: Timestamp,
    /// Seen with a respawn marker since the claim.
    depleted: bool,
}

/// Location → claim timestamp map.
#[derive(Clone, Debug)]
pub struct ResourceBlacklist {
    expiry: Duration,
    entries: HashMap<Position, Entry>,
}

impl ResourceBlacklist {
    pub fn new(expiry: Duration) -> Self {
        Self {
            expiry,
            entries: HashMap::new(),
        }
    }

    pub fn from_config(config: &BlacklistConfig) -> Self {
        Self::new(config.expiry())
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Inserts or refreshes the entry for `location`.
    pub fn claim(&mut self, location: Position, now: Timestamp) {
        let refreshed = self
            .entries
            .insert(
                location,
                Entry {
                    claimed_at: now,
                    depleted: false,
                },
            )
            .is_some();
        info!(%location, refreshed, "location blacklisted");
    }

    /// Drops the entry for `location`. Returns whether one existed.
    pub fn release(&mut self, location: Position) -> bool {
        self.entries.remove(&location).is_some()
    }

    fn is_live(&self, entry: &Entry, now: Timestamp) -> bool {
        now.elapsed_since(entry.claimed_at) < self.expiry
    }

    /// False while `location` has a live entry.
    pub fn is_available(&self, location: Position, now: Timestamp) -> bool {
        self.entries
            .get(&location)
            .is_none_or(|entry| !self.is_live(entry, now))
    }

    /// Timestamp of the live claim on `location`, if any.
    pub fn claimed_at(&self, location: Position, now: Timestamp) -> Option<Timestamp> {
        self.entries
            .get(&location)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.claimed_at)
    }

    /// Removes expired entries. Returns how many were removed.
    pub fn prune(&mut self, now: Timestamp) -> usize {
        let expiry = self.expiry;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.elapsed_since(entry.claimed_at) < expiry);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "pruned expired blacklist entries");
        }
        removed
    }

    /// Number of live entries at `now`.
    pub fn live_count(&self, now: Timestamp) -> usize {
        self.entries
            .values()
            .filter(|entry| self.is_live(entry, now))
            .count()
    }

    /// Total stored entries, including expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Releases entries whose node visibly respawned before the window ended.
    ///
    /// A live entry is first marked when its location shows a respawn marker.
    /// Once a marked location appears among `visible` candidates without the
    /// marker, the node is back and the entry is released. Entries never seen
    /// depleted are left alone: without the marker there is no evidence the
    /// node was ever exhausted (another agent may still be working it).
    pub fn reconcile(
        &mut self,
        signal: &RespawnSignal,
        visible: &[Position],
        now: Timestamp,
    ) -> Vec<Position> {
        let expiry = self.expiry;
        let mut released = Vec::new();

        for (location, entry) in &mut self.entries {
            if now.elapsed_since(entry.claimed_at) >= expiry {
                continue;
            }
            if signal.contains(*location) {
                entry.depleted = true;
            } else if entry.depleted && visible.contains(location) {
                released.push(*location);
            }
        }

        for location in &released {
            self.entries.remove(location);
            info!(%location, "node respawned, blacklist entry released early");
        }
        released
    }
}

impl Default for ResourceBlacklist {
    fn default() -> Self {
        Self::new(DEFAULT_BLACKLIST_EXPIRY)
    }
}
