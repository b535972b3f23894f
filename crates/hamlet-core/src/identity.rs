//! Per-request identity and language context.
//!
//! The host's middleware chain resolves a [`User`] and a [`Lang`] for every
//! page request and stores them as typed request extensions. Handlers take
//! them back out through the [`CurrentUser`] and [`Lang`] extractors; a
//! request that never passed through the chain resolves to the bare
//! anonymous sentinel and the built-in default language.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::Utc;

use crate::catalog::{Catalog, ROLE_ANON, ROLE_USER, Role};

/// Username reserved for the anonymous sentinel.
pub const ANONYMOUS_USERNAME: &str = "anon";

/// Language id used when no language layer ran and none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Name of the session-token cookie.
pub const COOKIE_SESSION: &str = "id";

/// Name of the language-preference cookie.
pub const COOKIE_LANG: &str = "lang";

/// A resolved request identity: a real authenticated user or the anonymous
/// sentinel, never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub roles: Vec<Role>,
}

impl User {
    /// The bare sentinel, with no roles attached.
    pub fn anonymous() -> Self {
        Self {
            username: ANONYMOUS_USERNAME.to_string(),
            roles: Vec::new(),
        }
    }

    /// The sentinel holding the catalog's `anon` role, when declared.
    pub fn anonymous_with(catalog: &Catalog) -> Self {
        let mut user = Self::anonymous();
        if let Some(role) = catalog.role(ROLE_ANON) {
            user.roles.push(role.clone());
        }
        user
    }

    /// An authenticated identity. Every authenticated user holds the
    /// catalog's `user` role; no further assignment mechanism exists.
    pub fn authenticated(username: impl Into<String>, catalog: &Catalog) -> Self {
        let mut roles = Vec::new();
        if let Some(role) = catalog.role(ROLE_USER) {
            roles.push(role.clone());
        }
        Self {
            username: username.into(),
            roles,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username == ANONYMOUS_USERNAME
    }

    /// True when any held role bundles the named capability.
    pub fn has_capability(&self, capability: &str) -> bool {
        self.roles.iter().any(|role| role.grants(capability))
    }
}

/// Extractor for the identity resolved by the middleware chain.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_else(|| CurrentUser(User::anonymous())))
    }
}

/// Extractor for the language resolved by the middleware chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lang(pub String);

impl Lang {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Lang>()
            .cloned()
            .unwrap_or_else(|| Lang(DEFAULT_LANGUAGE.to_string())))
    }
}

/// One capability-guard decision in the shape the audit log records. Not
/// persisted; the guard writes it to the structured log.
#[derive(Debug, Clone)]
pub struct Access {
    pub username: String,
    pub capability: String,
    pub details: String,
    /// Unix seconds, UTC.
    pub at: i64,
}

impl Access {
    pub fn new(user: &User, capability: &str, details: impl Into<String>) -> Self {
        Self {
            username: user.username.clone(),
            capability: capability.to_string(),
            details: details.into(),
            at: Utc::now().timestamp(),
        }
    }

    pub fn log_granted(&self) {
        tracing::info!(
            target: "hamlet::access",
            user = %self.username,
            capability = %self.capability,
            details = %self.details,
            at = self.at,
            granted = true,
        );
    }

    pub fn log_denied(&self) {
        tracing::warn!(
            target: "hamlet::access",
            user = %self.username,
            capability = %self.capability,
            details = %self.details,
            at = self.at,
            granted = false,
        );
    }
}
