use axum::Router;
use axum::routing::get;

use hamlet_core::AppState;

use super::controller::switch_language;

pub fn init_lang_router() -> Router<AppState> {
    Router::new().route("/lang/{id}", get(switch_language))
}
