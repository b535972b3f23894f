use axum::response::Html;

/// GET /
///
/// The public landing page, served inline without the layout.
pub async fn root() -> Html<&'static str> {
    // Valid HTML according to https://validator.w3.org/
    Html(r#"<!DOCTYPE HTML><html lang="en"><head><title>Hamlet</title><p>Hamlet"#)
}
