//! User identity resolution middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use tracing::{debug, error};

use hamlet_core::identity::COOKIE_SESSION;
use hamlet_core::{AppState, CurrentUser, User};

use crate::modules::auth::service::AuthService;

/// Resolves the request identity from the session cookie.
///
/// Lookup failures are never fatal here: an absent cookie, an unknown
/// token, and a storage error all degrade to the anonymous sentinel so
/// the request proceeds as an unauthenticated one.
pub async fn resolve_user(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let user = match jar.get(COOKIE_SESSION) {
        None => User::anonymous_with(&state.catalog),
        Some(cookie) => {
            match AuthService::find_user_by_session_token(&state.db, cookie.value()).await {
                Ok(Some(username)) => User::authenticated(username, &state.catalog),
                Ok(None) => {
                    debug!("identity: session token not found");
                    User::anonymous_with(&state.catalog)
                }
                Err(err) => {
                    error!(error = %err, "identity: session lookup failed");
                    User::anonymous_with(&state.catalog)
                }
            }
        }
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}
