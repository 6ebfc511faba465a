use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use super::types::{OutcomeSample, ReliabilityRecord, ReliabilitySnapshot};

/// Per-source outcome history. Never consulted when scoring.
#[derive(Debug, Default)]
pub struct ReliabilityTracker {
    records: RwLock<HashMap<String, ReliabilityRecord>>,
}

impl ReliabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, source_id: &str, available: bool, response_time_ms: u64) {
        self.record_at(source_id, available, response_time_ms, Utc::now());
    }

    pub fn record_at(
        &self,
        source_id: &str,
        available: bool,
        response_time_ms: u64,
        timestamp: DateTime<Utc>,
    ) {
        let sample = OutcomeSample {
            timestamp,
            available,
            response_time_ms,
        };
        let mut records = self.records.write();
        records
            .entry(source_id.to_string())
            .or_insert_with(|| ReliabilityRecord::new(source_id))
            .push(sample);
        debug!(source_id, available, response_time_ms, "Recorded outcome");
    }

    pub fn get(&self, source_id: &str) -> Option<ReliabilityRecord> {
        self.records.read().get(source_id).cloned()
    }

    /// Tracked source ids, sorted.
    pub fn sources(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    pub fn export(&self) -> ReliabilitySnapshot {
        let mut records: Vec<ReliabilityRecord> = self.records.read().values().cloned().collect();
        records.sort_by(|a, b| a.source_id.cmp(&b.source_id));
        ReliabilitySnapshot { records }
    }

    /// Merges a snapshot into the live records. Returns how many records it carried.
    pub fn import(&self, snapshot: ReliabilitySnapshot) -> usize {
        let count = snapshot.records.len();
        let mut records = self.records.write();
        for mut incoming in snapshot.records {
            incoming.trim_recent();
            match records.get_mut(&incoming.source_id) {
                Some(existing) => existing.merge(incoming),
                None => {
                    records.insert(incoming.source_id.clone(), incoming);
                }
            }
        }
        debug!(count, "Imported reliability records");
        count
    }
}
