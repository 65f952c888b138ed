use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use track_engine::model::ResultId;
use track_engine::model::SearchResult;
use track_engine::model::Subscriber;
use track_engine::model::TrackedQuery;
use track_engine::Delivery;
use track_engine::DeliveryError;
use track_engine::FetchError;
use track_engine::MemTrackStore;
use track_engine::OutboundMessage;
use track_engine::Result;
use track_engine::SearchPage;
use track_engine::SearchSource;
use track_engine::Tracker;
use track_engine::TrackerSettings;
use track_engine::TypeConfig;

pub const NOW: u64 = 1_700_000_000_000;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct MemTypeConfig;

impl TypeConfig for MemTypeConfig {
    type S = ScriptedSource;

    type P = MemTrackStore;

    type D = RecordingDelivery;
}

/// Search source backed by a fixed corpus per query text.
///
/// Answers like a real search: every indexed result above `since_id`.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    corpus: Mutex<HashMap<String, Vec<SearchResult>>>,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<(String, ResultId)>>,
}

impl ScriptedSource {
    pub fn index(
        &self,
        query: &str,
        ids: impl IntoIterator<Item = u64>,
    ) {
        let mut corpus = self.corpus.lock();
        let entry = corpus.entry(query.to_string()).or_default();
        for id in ids {
            entry.push(result(id, query, &format!("news {id}")));
        }
    }

    pub fn fail(
        &self,
        query: &str,
    ) {
        self.failing.lock().insert(query.to_string());
    }

    pub fn recover(
        &self,
        query: &str,
    ) {
        self.failing.lock().remove(query);
    }

    pub fn set_delay(
        &self,
        delay: Duration,
    ) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> Vec<(String, ResultId)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SearchSource for ScriptedSource {
    async fn query(
        &self,
        query: &str,
        since_id: ResultId,
    ) -> Result<SearchPage> {
        self.calls.lock().push((query.to_string(), since_id));

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().contains(query) {
            return Err(FetchError::SourceUnavailable(format!("{query} is down")).into());
        }

        let results: Vec<SearchResult> = self
            .corpus
            .lock()
            .get(query)
            .map(|all| all.iter().filter(|r| r.id > since_id).cloned().collect())
            .unwrap_or_default();
        Ok(SearchPage::from_results(results))
    }
}

/// Delivery that records every accepted message.
#[derive(Debug, Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<OutboundMessage>>,
    rejecting: Mutex<HashSet<String>>,
}

impl RecordingDelivery {
    pub fn reject(
        &self,
        address: &str,
    ) {
        self.rejecting.lock().insert(address.to_string());
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().clone()
    }

    pub fn sent_to(
        &self,
        address: &str,
    ) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.to == address)
            .map(|m| m.plain_body.clone())
            .collect()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn deliver(
        &self,
        message: OutboundMessage,
    ) -> Result<()> {
        if self.rejecting.lock().contains(&message.to) {
            return Err(DeliveryError::Rejected {
                address: message.to,
                reason: "recipient offline".to_string(),
            }
            .into());
        }
        self.sent.lock().push(message);
        Ok(())
    }
}

pub struct Harness {
    pub tracker: Tracker<MemTypeConfig>,
    pub source: Arc<ScriptedSource>,
    pub store: Arc<MemTrackStore>,
    pub delivery: Arc<RecordingDelivery>,
}

impl Harness {
    pub fn new(settings: TrackerSettings) -> Self {
        let source = Arc::new(ScriptedSource::default());
        let store = Arc::new(MemTrackStore::new());
        let delivery = Arc::new(RecordingDelivery::default());
        let tracker = Tracker::new(settings, source.clone(), store.clone(), delivery.clone());
        Self {
            tracker,
            source,
            store,
            delivery,
        }
    }

    /// Registers a query with the given watchers, creating subscribers as needed.
    pub fn track(
        &self,
        query_id: u64,
        query: &str,
        watchers: &[Subscriber],
    ) {
        self.store.insert_query(TrackedQuery::new(query_id, query));
        for subscriber in watchers {
            if self.store.watch(query_id, &subscriber.address).is_err() {
                self.store.insert_subscriber(subscriber.clone());
                self.store.watch(query_id, &subscriber.address).expect("subscriber was just inserted");
            }
        }
    }
}

pub fn result(
    id: u64,
    query: &str,
    text: &str,
) -> SearchResult {
    SearchResult {
        id: ResultId(id),
        query: query.to_string(),
        author: "newsbot".to_string(),
        text: text.to_string(),
        language: None,
    }
}

pub fn minutes(m: u64) -> u64 {
    m * 60_000
}
