//! Embedded static assets and the `/a/` route.
//!
//! One catch-all route serves every asset. The first path segment picks
//! the source: a registered plugin name serves from that plugin's
//! embedded `static/` tree, anything else serves from the host's own.
//! Asset requests skip the identity middleware entirely.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use include_dir::{Dir, include_dir};
use tower_http::set_header::SetResponseHeaderLayer;

use hamlet_core::AppState;

/// Host source tree embedded at build time: `static/` is served here,
/// `layout.html` and `views/` feed the template store, `texts.json`
/// feeds the site configuration.
pub static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/web");

pub fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/a/{*path}", get(serve))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ))
}

async fn serve(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    // "/a/directory/directory.css" serves static/directory.css from the
    // directory plugin; "/a/main.css" serves static/main.css from the host.
    let (dir, file): (&'static Dir<'static>, String) = match path.split_once('/') {
        Some((first, rest)) => match state.registry.get(first) {
            Some(plugin) => (plugin.assets(), format!("static/{rest}")),
            None => (&ASSETS, format!("static/{path}")),
        },
        None => (&ASSETS, format!("static/{path}")),
    };

    match dir.get_file(&file) {
        Some(found) => (
            [(header::CONTENT_TYPE, content_type(&file))],
            found.contents(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type("static/main.css"), "text/css; charset=utf-8");
        assert_eq!(content_type("static/logo.svg"), "image/svg+xml");
        assert_eq!(content_type("static/photo.jpeg"), "image/jpeg");
        assert_eq!(content_type("static/blob"), "application/octet-stream");
    }

    #[test]
    fn host_tree_carries_the_expected_files() {
        assert!(ASSETS.get_file("layout.html").is_some());
        assert!(ASSETS.get_file("texts.json").is_some());
        assert!(ASSETS.get_file("static/main.css").is_some());
        assert!(ASSETS.get_dir("views").is_some());
    }
}
