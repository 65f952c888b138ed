use crate::model::SearchResult;
use crate::model::Subscriber;

/// Per-subscriber eligibility check for a candidate result.
pub struct ResultFilter;

impl ResultFilter {
    /// All of the following must hold:
    /// - the subscriber is available
    /// - the result id is strictly above the subscriber's low-water mark
    /// - either side has no language, or both languages are equal
    pub fn passes(
        subscriber: &Subscriber,
        result: &SearchResult,
    ) -> bool {
        if !subscriber.is_available() {
            return false;
        }

        if result.id <= subscriber.min_id {
            return false;
        }

        match (&subscriber.language, &result.language) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}
