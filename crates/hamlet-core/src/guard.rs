//! Route guards, applied per route group. A route that carries no guard is
//! public on purpose; the router is the single place where that choice is
//! visible.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::identity::{Access, CurrentUser};

/// Passes authenticated requests through; anonymous ones are sent to the
/// login page instead.
pub async fn require_user(req: Request, next: Next) -> Response {
    match req.extensions().get::<CurrentUser>() {
        Some(current) if !current.0.is_anonymous() => next.run(req).await,
        _ => Redirect::to("/login").into_response(),
    }
}

/// Passes requests through when the current user holds `capability`.
/// Anonymous requests go to the login page; authenticated ones without the
/// capability get a permission-denied page. Every decision is written to
/// the access log.
///
/// Applied with a closure, since the capability is a parameter:
///
/// ```ignore
/// use axum::middleware;
/// use hamlet_core::guard::require_capability;
///
/// router.route_layer(middleware::from_fn(|req, next| {
///     require_capability("auth-logout", req, next)
/// }));
/// ```
pub async fn require_capability(capability: &'static str, req: Request, next: Next) -> Response {
    let Some(user) = req.extensions().get::<CurrentUser>().map(|c| c.0.clone()) else {
        return Redirect::to("/login").into_response();
    };
    if user.is_anonymous() {
        return Redirect::to("/login").into_response();
    }

    let access = Access::new(&user, capability, req.uri().path());
    if !user.has_capability(capability) {
        access.log_denied();
        return AppError::permission_denied(anyhow::anyhow!(
            "{} does not hold {}",
            user.username,
            capability
        ))
        .into_response();
    }
    access.log_granted();
    next.run(req).await
}
