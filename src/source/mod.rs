//! Search-source seam.
//!
//! The client behind this trait owns query execution, pagination and the
//! result schema; the engine only asks for results newer than a mark.

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;

use crate::model::ResultId;
use crate::model::SearchResult;
use crate::Result;

/// One response from the search source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Ordered oldest to newest.
    pub results: Vec<SearchResult>,
    /// Largest identifier the source reports for this response.
    pub max_id: ResultId,
}

impl SearchPage {
    /// Builds a page whose `max_id` is the largest result identifier.
    pub fn from_results(results: Vec<SearchResult>) -> Self {
        let max_id = results.iter().map(|r| r.id).max().unwrap_or_default();
        Self { results, max_id }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchSource: Send + Sync + 'static {
    /// Fails with `FetchError::SourceUnavailable` or `FetchError::RateLimited`
    /// on transient errors.
    async fn query(
        &self,
        query: &str,
        since_id: ResultId,
    ) -> Result<SearchPage>;
}
