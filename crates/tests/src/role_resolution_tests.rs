use crate::common::*;
use access::{CancellationToken, Clock, KeyValueStore};
use pretty_assertions::assert_eq;
use shared_types::{CachedRole, Role};

#[tokio::test]
async fn cold_start_with_healthy_endpoint_resolves_and_caches() {
    let h = harness();
    h.identity.sign_in("i1", "coach@academy.test");
    h.directory.assign("i1", "instructor");
    let nav = RecordingNavigator::at("/schedule");

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &nav)
        .await
        .expect("live scope");

    assert!(state.is_instructor);
    assert!(!state.is_admin);
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(h.directory.calls(), 1);

    let raw = h
        .store
        .get(&CachedRole::storage_key("i1"))
        .unwrap()
        .expect("role cached");
    let cached: CachedRole = serde_json::from_str(&raw).unwrap();
    assert_eq!(cached.role, Role::Instructor);
    assert_eq!(cached.user_id, "i1");
}

#[tokio::test]
async fn fresh_cache_skips_the_endpoint() {
    let h = harness();
    h.identity.sign_in("a1", "staff@academy.test");
    h.directory.assign("a1", "admin");
    let nav = RecordingNavigator::at("/admin");

    h.coordinator.resolve(&CancellationToken::new(), &nav).await;
    h.clock.advance_secs(119);
    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &nav)
        .await
        .expect("live scope");

    assert!(state.is_admin);
    assert_eq!(h.directory.calls(), 1);
}

#[tokio::test]
async fn expired_cache_goes_back_to_the_endpoint() {
    let h = harness();
    h.identity.sign_in("a1", "staff@academy.test");
    h.directory.assign("a1", "admin");
    let nav = RecordingNavigator::at("/admin");

    h.coordinator.resolve(&CancellationToken::new(), &nav).await;
    h.clock.advance_secs(121);
    h.directory.assign("a1", "member");
    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &nav)
        .await
        .expect("live scope");

    assert!(!state.is_admin);
    assert_eq!(h.directory.calls(), 2);
}

#[tokio::test]
async fn cache_entry_for_another_user_is_ignored() {
    let h = harness();
    let foreign = CachedRole::new("someone-else", Role::Admin, h.clock.now());
    h.store
        .set(
            &CachedRole::storage_key("m1"),
            &serde_json::to_string(&foreign).unwrap(),
        )
        .unwrap();
    h.identity.sign_in("m1", "member@academy.test");
    h.directory.assign("m1", "member");

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await
        .expect("live scope");

    assert!(!state.is_admin);
    assert_eq!(h.directory.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn degraded_endpoint_opens_breaker_after_three_timeouts() {
    let h = harness();
    h.directory.set_mode(DirectoryMode::Hanging);
    let nav = RecordingNavigator::at("/dashboard");

    for user in ["u1", "u2", "u3"] {
        h.identity.sign_in(user, &format!("{user}@academy.test"));
        let state = h
            .coordinator
            .resolve(&CancellationToken::new(), &nav)
            .await
            .expect("live scope");
        assert!(!state.is_admin);
        assert!(!state.is_instructor);
    }
    assert_eq!(h.directory.calls(), 3);
    assert!(h.coordinator.breaker().is_open());
    assert_eq!(h.coordinator.breaker().state().consecutive_failures, 3);

    h.identity.sign_in("u4", OWNER_EMAIL);
    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &nav)
        .await
        .expect("live scope");

    assert_eq!(h.directory.calls(), 3, "open breaker must short-circuit");
    assert!(state.is_admin, "allow-listed email falls back to admin");
    assert!(nav.replaced().contains(&"/admin".to_string()));
}

#[tokio::test(start_paused = true)]
async fn breaker_heals_after_open_window() {
    let h = harness();
    h.directory.set_mode(DirectoryMode::Failing);
    let nav = RecordingNavigator::at("/schedule");

    for user in ["u1", "u2", "u3"] {
        h.identity.sign_in(user, &format!("{user}@academy.test"));
        h.coordinator.resolve(&CancellationToken::new(), &nav).await;
    }
    assert!(h.coordinator.breaker().is_open());

    h.clock.advance_secs(31);
    h.directory.set_mode(DirectoryMode::Healthy);
    h.directory.assign("u5", "instructor");
    h.identity.sign_in("u5", "u5@academy.test");
    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &nav)
        .await
        .expect("live scope");

    assert!(state.is_instructor);
    assert_eq!(h.directory.calls(), 4);
    assert_eq!(h.coordinator.breaker().state().consecutive_failures, 0);
}

#[tokio::test]
async fn endpoint_failure_falls_back_to_allow_list() {
    let h = harness();
    h.directory.set_mode(DirectoryMode::Failing);
    h.identity.sign_in("o1", "OWNER@academy.test");

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/admin"))
        .await
        .expect("live scope");

    assert!(state.is_admin);
    assert_eq!(h.coordinator.breaker().state().consecutive_failures, 1);
}

#[tokio::test]
async fn unknown_user_on_healthy_endpoint_is_member() {
    let h = harness();
    h.directory.assign("other", "admin");
    h.identity.sign_in("m1", "member@academy.test");

    let state = h
        .coordinator
        .resolve(&CancellationToken::new(), &RecordingNavigator::at("/dashboard"))
        .await
        .expect("live scope");

    assert!(!state.is_admin);
    assert!(!state.is_instructor);
    assert_eq!(h.coordinator.breaker().state().consecutive_failures, 0);
}
