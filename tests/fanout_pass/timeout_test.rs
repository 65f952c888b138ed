use std::time::Duration;

use track_engine::model::ResultId;
use track_engine::model::Subscriber;
use track_engine::TrackerSettings;
use tracing_test::traced_test;

use crate::common::Harness;
use crate::common::NOW;

#[tokio::test(start_paused = true)]
#[traced_test]
async fn test_slow_source_is_abandoned_after_fetch_timeout() {
    let mut settings = TrackerSettings::default();
    settings.tracker.fetch_timeout_ms = 1_000;
    let h = Harness::new(settings);
    h.track(1, "rust", &[Subscriber::new("bob@example.org")]);
    h.source.index("rust", [1]);
    h.source.set_delay(Duration::from_secs(5));

    let report = h.tracker.run_due_pass(NOW).await;

    assert_eq!(report.queries_failed, 1);
    assert!(h.delivery.sent().is_empty());
    assert_eq!(h.store.query(1).unwrap().max_seen, ResultId::NONE);
    assert!(logs_contain("timed out"));
}

#[tokio::test(start_paused = true)]
async fn test_source_within_timeout_completes() {
    let mut settings = TrackerSettings::default();
    settings.tracker.fetch_timeout_ms = 10_000;
    let h = Harness::new(settings);
    h.track(1, "rust", &[Subscriber::new("bob@example.org")]);
    h.source.index("rust", [1]);
    h.source.set_delay(Duration::from_secs(2));

    let report = h.tracker.run_due_pass(NOW).await;

    assert_eq!(report.queries_polled, 1);
    assert_eq!(h.delivery.sent().len(), 1);
}
