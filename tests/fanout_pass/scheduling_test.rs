use track_engine::model::Presence;
use track_engine::model::Subscriber;
use track_engine::TrackerSettings;
use tracing_test::traced_test;

use crate::common::minutes;
use crate::common::Harness;
use crate::common::NOW;

fn watcher(
    address: &str,
    presence: Presence,
) -> Subscriber {
    let mut subscriber = Subscriber::new(address);
    subscriber.presence = presence;
    subscriber
}

#[tokio::test]
#[traced_test]
async fn test_poll_interval_shrinks_with_active_watchers() {
    let h = Harness::new(TrackerSettings::default());
    h.track(
        1,
        "rust",
        &[
            watcher("a@example.org", Presence::Available),
            watcher("b@example.org", Presence::Chat),
            watcher("c@example.org", Presence::Away),
            watcher("d@example.org", Presence::ExtendedAway),
            watcher("e@example.org", Presence::DoNotDisturb),
            watcher("f@example.org", Presence::Offline),
        ],
    );

    h.tracker.run_due_pass(NOW).await;

    // a, b, c and d count; dnd and offline do not
    assert_eq!(h.store.query(1).unwrap().next_update, NOW + minutes(2));
    assert!(logs_contain("Reduced poll interval"));
}

#[tokio::test]
async fn test_poll_interval_never_drops_below_one_minute() {
    let h = Harness::new(TrackerSettings::default());
    let crowd: Vec<Subscriber> = (0..12)
        .map(|i| Subscriber::new(format!("user{i}@example.org")))
        .collect();
    h.track(1, "rust", &crowd);

    h.tracker.run_due_pass(NOW).await;

    assert_eq!(h.store.query(1).unwrap().next_update, NOW + minutes(1));
}

#[tokio::test]
async fn test_unwatched_query_uses_base_frequency() {
    let mut settings = TrackerSettings::default();
    settings.tracker.base_frequency_minutes = 7;
    let h = Harness::new(settings);
    h.track(1, "rust", &[]);
    h.source.index("rust", [1, 2]);

    let report = h.tracker.run_due_pass(NOW).await;

    assert_eq!(report.messages_delivered, 0);
    let query = h.store.query(1).unwrap();
    assert_eq!(query.next_update, NOW + minutes(7));
    assert_eq!(query.max_seen.0, 2);
}
