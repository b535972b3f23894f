use anyhow::Error;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

/// Classification of a failure, mapped to an HTTP outcome by the
/// [`IntoResponse`] impl on [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid boot-time wiring: duplicate plugin or capability names, bad
    /// templates, unresolvable dependencies. Aborts startup when detected
    /// there; anything that slips through to a request is a plain 500.
    Configuration,
    /// A storage operation failed. Details go to the log, the client gets a
    /// generic failure page.
    Storage,
    /// The request is not tied to an authenticated user.
    AuthenticationFailure,
    /// The authenticated user does not hold a required capability.
    PermissionDenied,
    /// Nothing lives at the requested path.
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Storage => "storage",
            ErrorKind::AuthenticationFailure => "authentication-failure",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::NotFound => "not-found",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            error: err.into(),
        }
    }

    pub fn configuration<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Configuration, err)
    }

    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Storage, err)
    }

    pub fn authentication<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::AuthenticationFailure, err)
    }

    pub fn permission_denied<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::PermissionDenied, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.error)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::storage(err)
    }
}

/// Raw error detail never reaches the client: responses are either a
/// redirect or a self-contained page with a fixed message. Handlers that
/// want a richer page (language names, back links) render one through the
/// view layer before an `AppError` is ever produced.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.kind {
            ErrorKind::AuthenticationFailure => Redirect::to("/login").into_response(),
            ErrorKind::PermissionDenied => (
                StatusCode::FORBIDDEN,
                Html(fallback_page(
                    "Permission denied",
                    "You do not have permission to use this page.",
                )),
            )
                .into_response(),
            ErrorKind::NotFound => (
                StatusCode::NOT_FOUND,
                Html(fallback_page("Not found", "There is no page at this address.")),
            )
                .into_response(),
            ErrorKind::Configuration | ErrorKind::Storage => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(fallback_page("Error", "There was an unexpected error.")),
            )
                .into_response(),
        }
    }
}

// Self-contained so it works even when the template registry is the thing
// that failed. Arguments are fixed strings, never request data.
fn fallback_page(title: &str, msg: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body><h1>{title}</h1><p>{msg}</p><p><a href=\"/\">Back</a></p></body></html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_status() {
        let cases = [
            (ErrorKind::PermissionDenied, StatusCode::FORBIDDEN),
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::Configuration, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorKind::Storage, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, status) in cases {
            let resp = AppError::new(kind, anyhow::anyhow!("boom")).into_response();
            assert_eq!(resp.status(), status);
        }
    }

    #[test]
    fn authentication_failure_redirects_to_login() {
        let resp = AppError::authentication(anyhow::anyhow!("no session")).into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()["location"], "/login");
    }

    #[test]
    fn storage_errors_convert_from_sqlx() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind, ErrorKind::Storage);
    }
}
