use axum::Router;
use axum::routing::get;

use hamlet_core::AppState;

use super::controller::root;

pub fn init_root_router() -> Router<AppState> {
    Router::new().route("/", get(root))
}
