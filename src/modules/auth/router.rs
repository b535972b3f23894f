use axum::routing::get;
use axum::{Router, middleware};

use hamlet_core::AppState;
use hamlet_core::guard::require_capability;

use super::controller::{login_page, login_submit, logout};

pub fn init_auth_router() -> Router<AppState> {
    // The guard covers /logout only; /login has to stay reachable for the
    // anonymous sentinel.
    let guarded = Router::new()
        .route("/logout", get(logout))
        .route_layer(middleware::from_fn(|req, next| {
            require_capability("auth-logout", req, next)
        }));

    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .merge(guarded)
}
