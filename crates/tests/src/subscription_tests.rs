use crate::common::*;
use access::{CancellationToken, KeyValueStore};
use pretty_assertions::assert_eq;
use shared_types::{
    AppError, EffectiveSubscription, SubscriptionSnapshot, SUBSCRIPTION_CHECK_FAILED,
    SUBSCRIPTION_SNAPSHOT_KEY, SYNTHETIC_END_DATE,
};
use std::time::Duration;

#[tokio::test]
async fn admin_gets_synthetic_subscription_without_touching_the_table() {
    let h = harness();
    h.identity.sign_in("a1", "staff@academy.test");
    h.directory.assign("a1", "admin");

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/admin"))
        .await
        .expect("live scope");

    let subscription = state.subscription.expect("synthetic record");
    assert!(subscription.is_synthetic());
    assert_eq!(subscription.record().id, "admin-subscription");
    assert_eq!(subscription.record().end_date, SYNTHETIC_END_DATE);
    assert_eq!(subscription.record().price, 0.0);
    assert_eq!(h.subscriptions.call_count(), 0);
}

#[tokio::test]
async fn instructor_gets_synthetic_subscription() {
    let h = harness();
    h.identity.sign_in("i1", "coach@academy.test");
    h.directory.assign("i1", "instructor");

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/instructor"))
        .await
        .expect("live scope");

    assert_eq!(
        state.subscription.map(|s| s.record().plan_type.clone()),
        Some("instructor".to_string())
    );
    assert_eq!(h.subscriptions.call_count(), 0);
}

#[tokio::test]
async fn member_query_targets_newest_active_row() {
    let h = harness();
    h.identity.sign_in("m1", "member@academy.test");
    h.subscriptions.set_steady(Some(monthly_row("sub-1")));

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await
        .expect("live scope");

    assert_eq!(
        state.subscription,
        Some(EffectiveSubscription::Live(monthly_row("sub-1")))
    );
    let query = &h.subscriptions.queries()[0];
    assert_eq!(query.member_id, "m1");
    assert_eq!(query.status, "active");
    assert!(query.descending);
    assert_eq!(query.limit, 1);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_retry_with_linear_backoff() {
    let h = harness();
    h.identity.sign_in("m1", "member@academy.test");
    h.subscriptions.script(vec![
        Err(AppError::network("reset")),
        Err(AppError::unavailable("503")),
    ]);
    h.subscriptions.set_steady(Some(monthly_row("sub-1")));

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await
        .expect("live scope");

    assert!(state.has_active_subscription());
    assert_eq!(state.error, None);

    let times = h.subscriptions.call_times();
    assert_eq!(times.len(), 3);
    assert_eq!(times[1] - times[0], Duration::from_secs(1));
    assert_eq!(times[2] - times[1], Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_without_snapshot_report_failure() {
    let h = harness();
    h.identity.sign_in("m1", "member@academy.test");
    h.subscriptions.script(vec![
        Err(AppError::network("reset")),
        Err(AppError::network("reset")),
        Err(AppError::network("reset")),
    ]);

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await
        .expect("live scope");

    assert_eq!(h.subscriptions.call_count(), 3);
    assert_eq!(state.subscription, None);
    assert_eq!(state.error.as_deref(), Some(SUBSCRIPTION_CHECK_FAILED));
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_fall_back_to_own_snapshot() {
    let h = harness();
    h.identity.sign_in("m1", "member@academy.test");
    h.subscriptions.set_steady(Some(monthly_row("sub-1")));
    h.coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await;

    let raw = h.store.get(SUBSCRIPTION_SNAPSHOT_KEY).unwrap().expect("snapshot");
    let snapshot: SubscriptionSnapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot.member_id, "m1");

    h.subscriptions.script(vec![
        Err(AppError::timeout("slow")),
        Err(AppError::timeout("slow")),
        Err(AppError::timeout("slow")),
    ]);
    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await
        .expect("live scope");

    assert_eq!(
        state.subscription,
        Some(EffectiveSubscription::Live(monthly_row("sub-1")))
    );
    assert_eq!(state.error, None);
}

#[tokio::test(start_paused = true)]
async fn snapshot_of_another_member_is_not_served() {
    let h = harness();
    h.identity.sign_in("m1", "member@academy.test");
    h.subscriptions.set_steady(Some(monthly_row("sub-1")));
    h.coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await;

    h.identity.sign_in("m2", "other@academy.test");
    h.subscriptions.script(vec![
        Err(AppError::network("reset")),
        Err(AppError::network("reset")),
        Err(AppError::network("reset")),
    ]);
    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await
        .expect("live scope");

    assert_eq!(state.subscription, None);
    assert_eq!(state.error.as_deref(), Some(SUBSCRIPTION_CHECK_FAILED));
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_backoff_stops_retrying() {
    let h = harness();
    h.identity.sign_in("m1", "member@academy.test");
    h.subscriptions.script(vec![Err(AppError::network("reset"))]);
    let scope = CancellationToken::new();

    let canceller = {
        let scope = scope.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            scope.cancel();
        }
    };
    let nav = RecordingNavigator::at("/dashboard");
    let (state, ()) = tokio::join!(h.coordinator.resolve(&scope, &nav), canceller);

    assert_eq!(state, None);
    assert_eq!(h.subscriptions.call_count(), 1);
}
