use std::collections::BTreeMap;

use dashmap::DashMap;

use crate::model::ResultId;
use crate::model::SearchResult;

/// Results pending delivery for one subscriber, ordered by result id.
pub type PendingResults = BTreeMap<ResultId, SearchResult>;

/// Per-pass accumulator of deduplicated results per subscriber.
///
/// Keyed by subscriber address, then by result id, so a result surfaced by
/// several tracked queries is delivered at most once per subscriber. Safe to
/// fill from concurrent fetches.
#[derive(Debug, Default)]
pub struct FanoutCollector {
    pending: DashMap<String, PendingResults>,
}

impl FanoutCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create the subscriber's bucket and insert the result.
    ///
    /// A later insert for the same (subscriber, id) replaces the earlier one;
    /// the content is identical whichever query produced it.
    pub fn insert(
        &self,
        address: &str,
        result: SearchResult,
    ) {
        match self.pending.get_mut(address) {
            Some(mut bucket) => {
                bucket.insert(result.id, result);
            }
            None => {
                self.pending.entry(address.to_string()).or_default().insert(result.id, result);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_for(
        &self,
        address: &str,
    ) -> usize {
        self.pending.get(address).map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consumes the collector.
    ///
    /// Subscribers come back sorted by address and each subscriber's results
    /// in ascending id order, so delivery order is reproducible.
    pub fn drain(self) -> Vec<(String, Vec<SearchResult>)> {
        let mut drained: Vec<(String, Vec<SearchResult>)> = self
            .pending
            .into_iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(address, bucket)| (address, bucket.into_values().collect()))
            .collect();
        drained.sort_by(|a, b| a.0.cmp(&b.0));
        drained
    }
}
