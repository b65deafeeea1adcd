//! Capped Alert Log

use crate::record::{AlertRecord, Severity};
use ring_buffer::RingBuffer;
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

/// Default number of alerts retained
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Newest-first alert log. Once full, adding an alert evicts the oldest.
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: RingBuffer<AlertRecord>,
    /// Ids of resolved alerts still present in the log
    resolved: HashSet<Uuid>,
}

impl AlertLog {
    /// Create a log holding at most `capacity` alerts (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity.max(1)),
            resolved: HashSet::new(),
        }
    }

    /// Add an alert at the front, evicting the oldest beyond capacity
    pub fn push(&mut self, record: AlertRecord) {
        if let Some(evicted) = self.entries.push(record) {
            self.resolved.remove(&evicted.id);
            debug!("Alert {} evicted from log", evicted.id);
        }
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &AlertRecord> + '_ {
        self.entries.iter().rev()
    }

    /// Alerts of one severity, newest first
    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &AlertRecord> + '_ {
        self.iter().filter(move |a| a.severity == severity)
    }

    pub fn newest(&self) -> Option<&AlertRecord> {
        self.entries.newest()
    }

    pub fn oldest(&self) -> Option<&AlertRecord> {
        self.entries.oldest()
    }

    pub fn get(&self, id: Uuid) -> Option<&AlertRecord> {
        self.iter().find(|a| a.id == id)
    }

    /// Copy out the log, newest first
    pub fn snapshot(&self) -> Vec<AlertRecord> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Mark an alert resolved. Returns false if it is not in the log.
    pub fn resolve(&mut self, id: Uuid) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if self.resolved.insert(id) {
            info!("Alert resolved: {}", id);
        }
        true
    }

    pub fn is_resolved(&self, id: Uuid) -> bool {
        self.resolved.contains(&id)
    }

    pub fn unresolved_count(&self) -> usize {
        self.len() - self.resolved.len()
    }

    /// Remove all alerts and resolution state
    pub fn clear(&mut self) {
        self.entries.clear();
        self.resolved.clear();
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
