//! Language resolution middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use hamlet_core::identity::COOKIE_LANG;
use hamlet_core::{AppState, Lang};

/// Resolves the request language from the `lang` cookie.
///
/// A missing cookie or a value outside the supported set resolves to the
/// site default. The result lives only in this request's extensions;
/// concurrent requests never observe each other's language.
pub async fn resolve_language(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let lang = jar
        .get(COOKIE_LANG)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| state.site.supports(value))
        .unwrap_or_else(|| state.site.default_language.clone());

    req.extensions_mut().insert(Lang(lang));
    next.run(req).await
}
