mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_string, create_test_user, login, setup_test_app};
use sqlx::SqlitePool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_root_is_public_minimal_html(pool: SqlitePool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.starts_with("<!DOCTYPE HTML>"));
    assert!(body.contains("<p>Hamlet"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_plugin_routes_are_mounted_under_the_plugin_name(pool: SqlitePool) {
    create_test_user(&pool, "alice", "correct horse").await;
    let app = setup_test_app(pool).await;
    let cookie = login(&app, "alice", "correct horse").await;

    let request = Request::builder()
        .uri("/directory")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Signed in as alice"));

    let request = Request::builder()
        .uri("/directory/orgs")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("organizations on record"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_plugin_pages_redirect_anonymous_visitors(pool: SqlitePool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .uri("/directory")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_host_assets_are_served_with_cache_headers(pool: SqlitePool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .uri("/a/main.css")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/css; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=3600"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_plugin_assets_are_served_under_their_namespace(pool: SqlitePool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .uri("/a/directory/directory.css")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/css; charset=utf-8"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_assets_are_not_found(pool: SqlitePool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .uri("/a/no-such-file.css")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_paths_get_the_error_page(pool: SqlitePool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .uri("/no-such-page")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("There is no page at this address."));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_home_lists_plugin_capabilities(pool: SqlitePool) {
    create_test_user(&pool, "alice", "correct horse").await;
    let app = setup_test_app(pool).await;
    let cookie = login(&app, "alice", "correct horse").await;

    let request = Request::builder()
        .uri("/home")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    // One section per registered plugin, dashboards linked under the
    // plugin's mount point.
    assert!(body.contains("<h2>directory</h2>"));
    assert!(body.contains("<h2>tasks</h2>"));
    assert!(body.contains(r#"href="/directory/orgs""#));
    assert!(body.contains("List organizations"));
}
