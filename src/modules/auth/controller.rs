use axum::Form;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use time::Duration;
use tracing::{info, instrument};

use hamlet_core::identity::COOKIE_SESSION;
use hamlet_core::{AppError, AppState, CurrentUser, Lang, View};

use super::model::LoginForm;
use super::service::{AuthService, SESSION_MAX_AGE_SECS};

/// Shown for unknown usernames and wrong passwords alike, so the form
/// never confirms whether an account exists.
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";

/// GET /login
#[instrument(skip_all)]
pub async fn login_page(
    State(state): State<AppState>,
    lang: Lang,
) -> Result<Html<String>, AppError> {
    state.render(&lang, &View::new("main-login", login_title(&state)))
}

fn login_title(state: &AppState) -> String {
    format!("Login | {}", state.site.title)
}

/// POST /login
///
/// On success: mint a token, store the session, set the cookie, redirect
/// to the dashboard. On bad credentials: re-render the form with the
/// typed username kept and one fixed message.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login_submit(
    State(state): State<AppState>,
    lang: Lang,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if !AuthService::verify_login(&state.db, &form.username, &form.password).await? {
        let view = View::new("main-login", login_title(&state))
            .with("username", &form.username)
            .with("message", MSG_INVALID_CREDENTIALS);
        return Ok(state.render(&lang, &view)?.into_response());
    }

    let session = AuthService::create_session(&state.db, &form.username).await?;

    let cookie = Cookie::build((COOKIE_SESSION, session.token))
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(SESSION_MAX_AGE_SECS));
    Ok((jar.add(cookie), Redirect::to("/home")).into_response())
}

/// GET /logout
///
/// Global sign-out: every session row the user owns goes away, not just
/// the presented one.
#[instrument(skip_all, fields(username = %user.0.username))]
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let removed = AuthService::delete_sessions(&state.db, &user.0.username).await?;
    info!(removed, "logout: sessions revoked");

    let jar = jar.remove(Cookie::build((COOKIE_SESSION, "")).path("/"));
    Ok((jar, Redirect::to("/")).into_response())
}
