use axum::routing::get;
use axum::{Router, middleware};

use hamlet_core::AppState;
use hamlet_core::guard::require_user;

use super::controller::home;

pub fn init_home_router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route_layer(middleware::from_fn(require_user))
}
