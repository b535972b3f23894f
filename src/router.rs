use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Router, middleware};

use hamlet_core::{AppState, Lang};

use crate::assets::asset_routes;
use crate::logging::logging_middleware;
use crate::middleware::{resolve_language, resolve_user};
use crate::modules::auth::router::init_auth_router;
use crate::modules::home::router::init_home_router;
use crate::modules::lang::router::init_lang_router;
use crate::modules::root::router::init_root_router;

/// Builds the single dispatch table: host pages, one nested router per
/// plugin mounted at its name with the prefix stripped, and the shared
/// asset route. Pages and the fallback pass through the language and
/// identity chain; assets skip it; request logging wraps everything.
pub fn init_router(state: AppState) -> Router {
    let mut pages = Router::new()
        .merge(init_root_router())
        .merge(init_auth_router())
        .merge(init_home_router())
        .merge(init_lang_router());
    for plugin in state.registry.iter() {
        pages = pages.nest(&format!("/{}", plugin.name()), plugin.routes());
    }
    let pages = pages
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), resolve_user))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_language));

    Router::new()
        .merge(pages)
        .merge(asset_routes())
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Shared 404 page with a back link. Also the landing spot for dashboard
/// links whose target screen has no route yet.
async fn not_found(State(state): State<AppState>, lang: Lang) -> Response {
    match state.render_error(&lang, "There is no page at this address.", "/") {
        Ok(page) => (StatusCode::NOT_FOUND, page).into_response(),
        Err(err) => err.into_response(),
    }
}
