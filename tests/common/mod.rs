use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, Response};
use hashed_urls::router::init_router;
use hashed_urls::startup::init_app_state;
use hashed_urls::state::AppState;
use hashed_urls_config::PluginConfig;
use http_body_util::BodyExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;
use tower::ServiceExt;

/// A mutable and an immutable database with the same rows.
#[allow(dead_code)]
pub struct Fixtures {
    pub dir: TempDir,
    pub mutable: PathBuf,
    pub immutable: PathBuf,
}

/// Create a SQLite file with table `t` holding `ids`.
#[allow(dead_code)]
pub async fn create_db(path: &Path, ids: &[i64]) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::query("CREATE TABLE t (id INTEGER PRIMARY KEY)")
        .execute(&pool)
        .await
        .unwrap();
    for id in ids {
        sqlx::query("INSERT INTO t (id) VALUES (?)")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();
    }

    pool.close().await;
}

#[allow(dead_code)]
pub async fn fixtures() -> Fixtures {
    let dir = tempfile::tempdir().unwrap();
    let mutable = dir.path().join("mutable.db");
    let immutable = dir.path().join("immutable.db");
    create_db(&mutable, &[1, 2]).await;
    create_db(&immutable, &[1, 2]).await;
    Fixtures {
        dir,
        mutable,
        immutable,
    }
}

#[allow(dead_code)]
pub async fn setup_state(fixtures: &Fixtures, plugin_config: PluginConfig) -> AppState {
    init_app_state(
        std::slice::from_ref(&fixtures.mutable),
        std::slice::from_ref(&fixtures.immutable),
        plugin_config,
    )
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn setup_test_app(fixtures: &Fixtures, plugin_config: PluginConfig) -> (axum::Router, String) {
    let state = setup_state(fixtures, plugin_config).await;
    let hash = state.registry.hash_for("immutable").unwrap().to_string();
    (init_router(state), hash)
}

#[allow(dead_code)]
pub async fn get(app: &axum::Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
