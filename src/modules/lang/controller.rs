use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use tracing::{info, instrument};

use hamlet_core::identity::COOKIE_LANG;
use hamlet_core::{AppError, AppState, Lang, View};

/// GET /lang/{id}
///
/// Saves a supported language id in the language cookie and sends the
/// browser back to the page it came from; an unsupported id gets an
/// error page naming it. The switch takes effect from the next request,
/// when the language middleware reads the new cookie.
#[instrument(skip_all)]
pub async fn switch_language(
    State(state): State<AppState>,
    lang: Lang,
    Path(id): Path<String>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<Response, AppError> {
    info!(lang = %id, "lang: switch");

    if !state.site.supports(&id) {
        let view = View::new("main-error", "Unsupported Language")
            .with("msg", &format!("Language not supported: {id:?}"))
            .with("back_url", "/");
        return Ok(state.render(&lang, &view)?.into_response());
    }

    // Session-lifetime cookie: no max-age on purpose.
    let cookie = Cookie::build((COOKIE_LANG, id)).path("/").http_only(true);
    let jar = jar.add(cookie);

    let back = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("/")
        .to_string();
    Ok((jar, (StatusCode::FOUND, [(header::LOCATION, back)])).into_response())
}
