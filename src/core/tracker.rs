use std::sync::Arc;
use std::time::Duration;

use futures::stream;
use futures::StreamExt;
use serde::Serialize;
use tokio::time::timeout;
use tokio::time::Instant;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use super::fanout::FanoutCollector;
use super::filter::ResultFilter;
use super::formatter::BodyFormatter;
use super::scheduler::IntervalScheduler;
use super::scheduler::WatcherLoad;
use crate::alias::DOF;
use crate::alias::POF;
use crate::alias::SOF;
use crate::metrics::DELIVERY_FAILURES_TOTAL;
use crate::metrics::FETCH_TOTAL;
use crate::metrics::MESSAGES_DELIVERED_TOTAL;
use crate::metrics::PASS_DURATION_MS;
use crate::model::ResultId;
use crate::model::SearchResult;
use crate::model::TrackedQuery;
use crate::utils::time::Timestamp;
use crate::Delivery;
use crate::DeliveryError;
use crate::Error;
use crate::FetchError;
use crate::OutboundMessage;
use crate::PollUpdate;
use crate::Result;
use crate::SearchPage;
use crate::SearchSource;
use crate::TrackStore;
use crate::TrackerSettings;
use crate::TypeConfig;

/// Counters for one fan-out pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub queries_polled: usize,
    pub queries_failed: usize,
    pub messages_delivered: usize,
    pub rich_fallbacks: usize,
    pub delivery_failures: usize,
}

/// Orchestrates fan-out passes over tracked queries.
///
/// A pass fetches incremental results for every query, writes the polling
/// bookkeeping back, collects deduplicated per-subscriber results and finally
/// delivers them. A failure in one query or one delivery never aborts the
/// rest of the pass.
pub struct Tracker<T>
where
    T: TypeConfig,
{
    settings: Arc<TrackerSettings>,
    scheduler: IntervalScheduler,
    formatter: BodyFormatter,
    source: Arc<SOF<T>>,
    store: Arc<POF<T>>,
    delivery: Arc<DOF<T>>,
}

impl<T> Tracker<T>
where
    T: TypeConfig,
{
    pub fn new(
        settings: TrackerSettings,
        source: Arc<SOF<T>>,
        store: Arc<POF<T>>,
        delivery: Arc<DOF<T>>,
    ) -> Self {
        let scheduler = IntervalScheduler::new(settings.tracker.base_frequency_minutes);
        let formatter = BodyFormatter::new(&settings.render);
        Self {
            settings: Arc::new(settings),
            scheduler,
            formatter,
            source,
            store,
            delivery,
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Runs a pass over every query the store reports as due at `now`.
    #[instrument(skip(self))]
    pub async fn run_due_pass(
        &self,
        now: Timestamp,
    ) -> PassReport {
        match self.store.due_queries(now).await {
            Ok(queries) => self.run_pass(queries, now).await,
            Err(e) => {
                error!(error = %e, "Failed to load due tracked queries");
                PassReport::default()
            }
        }
    }

    /// Runs one fan-out pass over `queries`.
    #[instrument(skip(self, queries), fields(queries = queries.len()))]
    pub async fn run_pass(
        &self,
        queries: Vec<TrackedQuery>,
        now: Timestamp,
    ) -> PassReport {
        let started = Instant::now();
        let collector = FanoutCollector::new();
        let mut report = PassReport::default();

        let concurrency = self.settings.tracker.fetch_concurrency.max(1);
        let outcomes: Vec<bool> = stream::iter(queries)
            .map(|query| self.poll_query(query, now, &collector))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        for polled in outcomes {
            if polled {
                report.queries_polled += 1;
            } else {
                report.queries_failed += 1;
            }
        }

        self.deliver_all(collector, &mut report).await;

        PASS_DURATION_MS.observe(started.elapsed().as_secs_f64() * 1000.0);
        info!(?report, "Fan-out pass finished");
        report
    }

    /// Fetches one query and feeds its new results into the collector.
    ///
    /// Returns false when the fetch failed; the query is then left untouched.
    async fn poll_query(
        &self,
        query: TrackedQuery,
        now: Timestamp,
        collector: &FanoutCollector,
    ) -> bool {
        let old_high_water = query.max_seen;
        debug!(query = %query.query, since_id = %old_high_water, "Fetching tracked query");

        let page = match self.fetch(&query.query, old_high_water).await {
            Ok(page) => {
                FETCH_TOTAL.with_label_values(&["ok"]).inc();
                page
            }
            Err(e) => {
                FETCH_TOTAL.with_label_values(&[e.kind()]).inc();
                error!(query = %query.query, error = %e, "Error fetching tracked query");
                return false;
            }
        };

        let update = PollUpdate {
            max_seen: old_high_water.max(page.max_id),
            last_update: now,
            next_update: self.next_update(&query, now).await,
        };
        if let Err(e) = self.store.record_poll(query.id, update).await {
            error!(query = %query.query, error = %e, "Failed to record poll bookkeeping");
        }

        let fresh = select_new_results(page.results, old_high_water, self.settings.tracker.bootstrap_limit);
        if fresh.is_empty() {
            return true;
        }

        let watchers = match self.store.watchers(query.id).await {
            Ok(watchers) => watchers,
            Err(e) => {
                error!(query = %query.query, error = %e, "Failed to load watchers");
                return true;
            }
        };

        for subscriber in watchers.iter().filter(|s| s.is_available()) {
            for result in &fresh {
                if ResultFilter::passes(subscriber, result) {
                    collector.insert(&subscriber.address, result.clone());
                }
            }
        }
        true
    }

    async fn fetch(
        &self,
        query: &str,
        since_id: ResultId,
    ) -> Result<SearchPage> {
        let limit = Duration::from_millis(self.settings.tracker.fetch_timeout_ms);
        match timeout(limit, self.source.query(query, since_id)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(limit).into()),
        }
    }

    /// Next poll time from a fresh read of the query's watcher load.
    async fn next_update(
        &self,
        query: &TrackedQuery,
        now: Timestamp,
    ) -> Timestamp {
        let load = match self.store.active_watcher_count(query.id).await {
            Ok(count) => WatcherLoad::new(count),
            Err(e) => {
                warn!(query = %query.query, error = %e, "Watcher count unavailable, using base frequency");
                WatcherLoad::single()
            }
        };

        let minutes = self.scheduler.interval_minutes(load);
        if minutes < self.scheduler.base_frequency_minutes() {
            info!(
                query = %query.query,
                minutes,
                active_watchers = load.active_count,
                "Reduced poll interval"
            );
        }
        self.scheduler.compute(load, now)
    }

    async fn deliver_all(
        &self,
        collector: FanoutCollector,
        report: &mut PassReport,
    ) {
        for (address, results) in collector.drain() {
            info!(to = %address, messages = results.len(), "Sending track messages");
            for result in results {
                let rendered = self.formatter.render(&result);
                if rendered.is_fallback() {
                    report.rich_fallbacks += 1;
                }
                let message = rendered.into_message(address.clone(), self.settings.render.subject.clone());

                match self.deliver(message).await {
                    Ok(()) => {
                        MESSAGES_DELIVERED_TOTAL.inc();
                        report.messages_delivered += 1;
                    }
                    Err(e) => {
                        DELIVERY_FAILURES_TOTAL.inc();
                        report.delivery_failures += 1;
                        warn!(to = %address, result_id = %result.id, error = %e, "Delivery failed");
                    }
                }
            }
        }
    }

    async fn deliver(
        &self,
        message: OutboundMessage,
    ) -> Result<()> {
        let limit = Duration::from_millis(self.settings.tracker.delivery_timeout_ms);
        match timeout(limit, self.delivery.deliver(message)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Delivery(DeliveryError::Timeout(limit))),
        }
    }
}

/// Picks the results a pass should fan out.
///
/// A never-polled query (`high_water == 0`) yields at most `bootstrap_limit`
/// of the most recent results; otherwise every result above the mark.
pub fn select_new_results(
    results: Vec<SearchResult>,
    high_water: ResultId,
    bootstrap_limit: usize,
) -> Vec<SearchResult> {
    if high_water.is_none() {
        let mut results = results;
        results.sort_by_key(|r| r.id);
        let skip = results.len().saturating_sub(bootstrap_limit);
        results.into_iter().skip(skip).collect()
    } else {
        results.into_iter().filter(|r| r.id > high_water).collect()
    }
}
