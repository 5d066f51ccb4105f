mod common;

use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, LOCATION};
use hashed_urls::startup::init_app_state;
use hashed_urls_config::{Metadata, PluginConfig};
use common::{body_json, create_db, fixtures, get, setup_test_app};

fn assert_no_long_lived_cache(response: &axum::http::Response<axum::body::Body>, path: &str) {
    if let Some(value) = response.headers().get(CACHE_CONTROL) {
        assert_eq!(value, "max-age=5", "cache-control for {}", path);
    }
}

#[tokio::test]
async fn test_immutable_database_renamed_on_startup() {
    let fixtures = fixtures().await;
    let (app, hash) = setup_test_app(&fixtures, PluginConfig::default()).await;

    let response = get(&app, "/-/databases.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|db| db["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"mutable"));

    let other = names.iter().find(|n| **n != "mutable").unwrap();
    assert!(other.starts_with("immutable_"));
    assert_eq!(*other, format!("immutable_{}", hash));
    assert!(!hash.is_empty());
}

#[tokio::test]
async fn test_paths_with_no_hash_redirect() {
    let fixtures = fixtures().await;
    let (app, hash) = setup_test_app(&fixtures, PluginConfig::default()).await;

    let cases = [
        ("/", false),
        ("/mutable", false),
        ("/mutable/t", false),
        ("/mutable/t/1", false),
        ("/immutable", true),
        ("/immutable/t", true),
        ("/immutable/t?id=1", true),
        ("/immutable/t/1", true),
    ];

    for (path, should_redirect) in cases {
        let response = get(&app, path).await;
        assert_no_long_lived_cache(&response, path);

        if should_redirect {
            assert_eq!(response.status(), StatusCode::FOUND, "status for {}", path);
            let expected = path.replacen("/immutable", &format!("/immutable_{}", hash), 1);
            assert_eq!(
                response.headers().get(LOCATION).unwrap(),
                expected.as_str(),
                "location for {}",
                path
            );
        } else {
            assert_eq!(response.status(), StatusCode::OK, "status for {}", path);
        }
    }
}

#[tokio::test]
async fn test_redirect_carries_short_ttl() {
    let fixtures = fixtures().await;
    let (app, _) = setup_test_app(&fixtures, PluginConfig::default()).await;

    let response = get(&app, "/immutable/t").await;
    assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "max-age=5");
}

#[tokio::test]
async fn test_redirect_ttl_can_be_disabled() {
    let fixtures = fixtures().await;
    let config = PluginConfig {
        redirect_max_age: 0,
        ..PluginConfig::default()
    };
    let (app, _) = setup_test_app(&fixtures, config).await;

    let response = get(&app, "/immutable/t").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(response.headers().get(CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn test_paths_with_hash_have_cache_header() {
    let fixtures = fixtures().await;

    for max_age in [None, Some(3600u64)] {
        let metadata = match max_age {
            Some(max_age) => Metadata::from_json(&format!(
                r#"{{"plugins": {{"datasette-hashed-urls": {{"max_age": {}}}}}}}"#,
                max_age
            ))
            .unwrap(),
            None => Metadata::default(),
        };
        let config = PluginConfig::from_metadata(&metadata).unwrap();
        let (app, hash) = setup_test_app(&fixtures, config).await;

        for suffix in ["", "/t", "/t?id=1", "/t/1"] {
            let path = format!("/immutable_{}{}", hash, suffix);
            let response = get(&app, &path).await;
            assert_eq!(response.status(), StatusCode::OK, "status for {}", path);

            let expected = format!("max-age={}, public", max_age.unwrap_or(31_536_000));
            assert_eq!(
                response.headers().get(CACHE_CONTROL).unwrap(),
                expected.as_str(),
                "cache-control for {}",
                path
            );
        }
    }
}

#[tokio::test]
async fn test_hashed_path_serves_underlying_data() {
    let fixtures = fixtures().await;
    let (app, hash) = setup_test_app(&fixtures, PluginConfig::default()).await;

    let response = get(&app, &format!("/immutable_{}/t?id=1", hash)).await;
    let body = body_json(response).await;
    assert_eq!(body["database"], format!("immutable_{}", hash));
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(body["rows"][0]["id"], 1);

    let response = get(&app, &format!("/immutable_{}/t/2", hash)).await;
    let body = body_json(response).await;
    assert_eq!(body["row"]["id"], 2);
}

#[tokio::test]
async fn test_mutable_paths_get_no_cache_header() {
    let fixtures = fixtures().await;
    let (app, _) = setup_test_app(&fixtures, PluginConfig::default()).await;

    for path in ["/mutable", "/mutable/t", "/mutable/t?id=1", "/mutable/t/1"] {
        let response = get(&app, path).await;
        assert_eq!(response.status(), StatusCode::OK, "status for {}", path);
        assert!(
            response.headers().get(CACHE_CONTROL).is_none(),
            "cache-control for {}",
            path
        );
    }
}

#[tokio::test]
async fn test_stale_hash_passes_through() {
    let fixtures = fixtures().await;
    let (app, hash) = setup_test_app(&fixtures, PluginConfig::default()).await;
    let stale = if hash == "00000000" { "11111111" } else { "00000000" };

    let response = get(&app, &format!("/immutable_{}/t", stale)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(CACHE_CONTROL).is_none());
    assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let fixtures = fixtures().await;
    let (app, hash) = setup_test_app(&fixtures, PluginConfig::default()).await;

    let first = get(&app, "/immutable/t?id=1").await;
    let second = get(&app, "/immutable/t?id=1").await;
    assert_eq!(first.status(), second.status());
    assert_eq!(
        first.headers().get(LOCATION),
        second.headers().get(LOCATION)
    );

    let path = format!("/immutable_{}/t/1", hash);
    let first = get(&app, &path).await;
    let second = get(&app, &path).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(
        first.headers().get(CACHE_CONTROL),
        second.headers().get(CACHE_CONTROL)
    );
    assert_eq!(body_json(first).await, body_json(second).await);
}

#[tokio::test]
async fn test_hash_changes_with_content() {
    let fixtures = fixtures().await;
    let changed = fixtures.dir.path().join("changed.db");
    create_db(&changed, &[1, 2, 3]).await;

    let original = init_app_state(&[], &[fixtures.immutable.clone()], PluginConfig::default())
        .await
        .unwrap();
    let other = init_app_state(&[], &[changed], PluginConfig::default())
        .await
        .unwrap();

    assert_ne!(
        original.registry.hash_for("immutable").map(|h| h.to_string()),
        other.registry.hash_for("changed").map(|h| h.to_string())
    );
}

#[tokio::test]
async fn test_error_if_db_contains_underscore() {
    let dir = tempfile::tempdir().unwrap();
    let bad_db = dir.path().join("bad_db.db");
    create_db(&bad_db, &[1]).await;

    let err = init_app_state(&[], &[bad_db], PluginConfig::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "datasette-hashed-urls does not work with databases with \"_\" in their name"
    );
}

#[tokio::test]
async fn test_error_if_mutable_db_contains_underscore() {
    let dir = tempfile::tempdir().unwrap();
    let bad_db = dir.path().join("bad_db.db");
    create_db(&bad_db, &[1]).await;

    let err = init_app_state(&[bad_db], &[], PluginConfig::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "datasette-hashed-urls does not work with databases with \"_\" in their name"
    );
}
