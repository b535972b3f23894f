//! Shared helpers for integration tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use hamlet::boot::{build_state, plugins, run_plugin_inits};
use hamlet::config::site_config;
use hamlet::router::init_router;
use hamlet::utils::password::hash_password;
use hamlet_core::state::AppState;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Assembles the full application state the way `main` does, minus the
/// background session reaper.
#[allow(dead_code)]
pub async fn test_state(pool: SqlitePool) -> AppState {
    dotenvy::dotenv().ok();

    let site = site_config().expect("site config should load from defaults");
    let state = build_state(pool, site, plugins()).expect("state should assemble");
    run_plugin_inits(&state)
        .await
        .expect("plugin init should succeed");
    state
}

#[allow(dead_code)]
pub async fn setup_test_app(pool: SqlitePool) -> Router {
    init_router(test_state(pool).await)
}

#[allow(dead_code)]
pub async fn create_test_user(pool: &SqlitePool, username: &str, password: &str) {
    let record = hash_password(password).expect("hashing should succeed");

    sqlx::query("INSERT INTO user (username, password, salt) VALUES (?, ?, ?)")
        .bind(username)
        .bind(&record.digest)
        .bind(&record.salt)
        .execute(pool)
        .await
        .expect("test user insert should succeed");
}

/// Logs in through the real form endpoint and returns the session cookie
/// as a `name=value` pair ready for a `Cookie` request header.
#[allow(dead_code)]
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(format!(
            "username={username}&password={password}"
        )))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();

    set_cookie
        .split(';')
        .next()
        .expect("cookie header should have a name=value part")
        .to_string()
}

#[allow(dead_code)]
pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("response body should be UTF-8")
}
