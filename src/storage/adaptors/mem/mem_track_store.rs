use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use crate::model::Subscriber;
use crate::model::TrackedQuery;
use crate::utils::time::Timestamp;
use crate::PollUpdate;
use crate::Result;
use crate::StorageError;
use crate::TrackStore;

/// In-memory track store.
///
/// Suitable for embedding hosts and tests; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemTrackStore {
    queries: RwLock<BTreeMap<u64, TrackedQuery>>,
    subscribers: RwLock<HashMap<String, Subscriber>>,
    /// query id -> subscriber addresses
    watches: RwLock<HashMap<u64, BTreeSet<String>>>,
}

impl MemTrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_query(
        &self,
        query: TrackedQuery,
    ) {
        self.queries.write().insert(query.id, query);
    }

    /// Inserts or replaces a subscriber, keyed by address.
    pub fn insert_subscriber(
        &self,
        subscriber: Subscriber,
    ) {
        self.subscribers.write().insert(subscriber.address.clone(), subscriber);
    }

    pub fn watch(
        &self,
        query_id: u64,
        address: &str,
    ) -> Result<()> {
        if !self.queries.read().contains_key(&query_id) {
            return Err(StorageError::QueryNotFound(query_id).into());
        }
        if !self.subscribers.read().contains_key(address) {
            return Err(StorageError::SubscriberNotFound(address.to_string()).into());
        }
        self.watches.write().entry(query_id).or_default().insert(address.to_string());
        Ok(())
    }

    pub fn query(
        &self,
        query_id: u64,
    ) -> Option<TrackedQuery> {
        self.queries.read().get(&query_id).cloned()
    }

    pub fn update_subscriber<F>(
        &self,
        address: &str,
        f: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Subscriber),
    {
        let mut subscribers = self.subscribers.write();
        let subscriber = subscribers
            .get_mut(address)
            .ok_or_else(|| StorageError::SubscriberNotFound(address.to_string()))?;
        f(subscriber);
        Ok(())
    }

    fn ensure_query(
        &self,
        query_id: u64,
    ) -> Result<()> {
        if self.queries.read().contains_key(&query_id) {
            Ok(())
        } else {
            Err(StorageError::QueryNotFound(query_id).into())
        }
    }
}

#[async_trait]
impl TrackStore for MemTrackStore {
    async fn due_queries(
        &self,
        now: Timestamp,
    ) -> Result<Vec<TrackedQuery>> {
        let due: Vec<TrackedQuery> = self.queries.read().values().filter(|q| q.is_due(now)).cloned().collect();
        trace!(due = due.len(), now, "due_queries");
        Ok(due)
    }

    async fn watchers(
        &self,
        query_id: u64,
    ) -> Result<Vec<Subscriber>> {
        self.ensure_query(query_id)?;

        let watches = self.watches.read();
        let subscribers = self.subscribers.read();
        Ok(watches
            .get(&query_id)
            .map(|addresses| addresses.iter().filter_map(|a| subscribers.get(a).cloned()).collect())
            .unwrap_or_default())
    }

    async fn active_watcher_count(
        &self,
        query_id: u64,
    ) -> Result<usize> {
        self.ensure_query(query_id)?;

        let watches = self.watches.read();
        let subscribers = self.subscribers.read();
        Ok(watches
            .get(&query_id)
            .map(|addresses| {
                addresses
                    .iter()
                    .filter_map(|a| subscribers.get(a))
                    .filter(|s| s.counts_toward_load())
                    .count()
            })
            .unwrap_or(0))
    }

    async fn record_poll(
        &self,
        query_id: u64,
        update: PollUpdate,
    ) -> Result<()> {
        let mut queries = self.queries.write();
        let query = queries.get_mut(&query_id).ok_or(StorageError::QueryNotFound(query_id))?;

        // high-water mark never moves backwards
        query.max_seen = query.max_seen.max(update.max_seen);
        query.last_update = Some(update.last_update);
        query.next_update = update.next_update;
        trace!(query_id, ?update, "record_poll");
        Ok(())
    }
}
