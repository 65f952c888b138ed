use std::sync::Arc;

use crate::model::ResultId;
use crate::model::SearchResult;
use crate::model::Subscriber;
use crate::MockDelivery;
use crate::MockSearchSource;
use crate::MockTrackStore;
use super::MockTypeConfig;
use crate::Tracker;
use crate::TrackerSettings;

pub(crate) const NOW: u64 = 1_700_000_000_000;

pub(crate) fn search_result(
    id: u64,
    query: &str,
) -> SearchResult {
    SearchResult {
        id: ResultId(id),
        query: query.to_string(),
        author: "alice".to_string(),
        text: format!("result {id} for {query}"),
        language: None,
    }
}

/// Results with ids in `ids`, oldest first.
pub(crate) fn search_results(
    ids: impl IntoIterator<Item = u64>,
    query: &str,
) -> Vec<SearchResult> {
    ids.into_iter().map(|id| search_result(id, query)).collect()
}

pub(crate) fn subscriber(address: &str) -> Subscriber {
    Subscriber::new(address)
}

pub(crate) fn mock_tracker(
    settings: TrackerSettings,
    source: MockSearchSource,
    store: MockTrackStore,
    delivery: MockDelivery,
) -> Tracker<MockTypeConfig> {
    Tracker::new(settings, Arc::new(source), Arc::new(store), Arc::new(delivery))
}
