#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::model::ResultId;
use crate::model::Subscriber;
use crate::model::TrackedQuery;
use crate::utils::time::Timestamp;
use crate::Result;

/// Bookkeeping written back after a successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollUpdate {
    pub max_seen: ResultId,
    pub last_update: Timestamp,
    pub next_update: Timestamp,
}

/// Storage for tracked queries, subscribers and the watch relation.
///
/// The tracker only reads subscribers and only writes the three polling
/// fields of a query.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TrackStore: Send + Sync + 'static {
    /// Queries whose `next_update <= now`.
    async fn due_queries(
        &self,
        now: Timestamp,
    ) -> Result<Vec<TrackedQuery>>;

    /// Every subscriber watching the query, whatever its presence.
    async fn watchers(
        &self,
        query_id: u64,
    ) -> Result<Vec<Subscriber>>;

    /// Fresh count of watchers for which `Subscriber::counts_toward_load` holds.
    async fn active_watcher_count(
        &self,
        query_id: u64,
    ) -> Result<usize>;

    async fn record_poll(
        &self,
        query_id: u64,
        update: PollUpdate,
    ) -> Result<()>;
}
