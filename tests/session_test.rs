// ABOUTME: Tests for the file-backed session store
// ABOUTME: Covers round trips, tolerant reads of corrupt files, and clearing

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use trainerroad_export::session::{CookieJar, SessionMeta, SessionStore};

#[tokio::test]
async fn session_round_trips_cookies_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");
    let store = SessionStore::new(&path);

    let mut jar = CookieJar::new();
    jar.apply_set_cookie("SharedTrainerRoadAuth=secret; Path=/; HttpOnly");
    jar.apply_set_cookie("TrainerRoadSession=abc");
    store
        .save(
            &jar,
            SessionMeta {
                authenticated_at: Some("2024-03-01T00:00:00Z".into()),
                last_login_redirect: Some("/app/career/rider".into()),
            },
        )
        .await
        .unwrap();

    let loaded = store.load().await;
    assert_eq!(
        loaded.cookies.get("SharedTrainerRoadAuth").map(String::as_str),
        Some("secret")
    );
    assert_eq!(
        loaded.cookies.get("TrainerRoadSession").map(String::as_str),
        Some("abc")
    );
    assert_eq!(
        loaded.authenticated_at.as_deref(),
        Some("2024-03-01T00:00:00Z")
    );
    assert_eq!(loaded.last_login_redirect.as_deref(), Some("/app/career/rider"));
    assert!(loaded.updated_at.is_some());

    // No temp file left behind by the write-then-rename strategy.
    let names: Vec<String> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["session.json".to_owned()]);
}

#[tokio::test]
async fn missing_session_file_is_an_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("absent.json"));
    let loaded = store.load().await;
    assert!(loaded.cookies.is_empty());
    assert!(loaded.authenticated_at.is_none());
}

#[tokio::test]
async fn corrupt_session_file_is_an_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    tokio::fs::write(&path, "{ not json at all").await.unwrap();
    let store = SessionStore::new(&path);
    let loaded = store.load().await;
    assert!(loaded.cookies.is_empty());
}

#[tokio::test]
async fn partial_session_payload_reads_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    tokio::fs::write(&path, r#"{ "cookies": { "a": "1" } }"#)
        .await
        .unwrap();
    let store = SessionStore::new(&path);
    let loaded = store.load().await;
    assert_eq!(loaded.cookies.get("a").map(String::as_str), Some("1"));
    assert!(loaded.updated_at.is_none());
}

#[tokio::test]
async fn clear_removes_the_file_and_tolerates_absence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = SessionStore::new(&path);

    store.save(&CookieJar::new(), SessionMeta::default()).await.unwrap();
    assert!(path.exists());
    store.clear().await.unwrap();
    assert!(!path.exists());
    // A second clear is not an error.
    store.clear().await.unwrap();
}
