//! Middleware for request processing.
//!
//! Every page request passes through two decorators that resolve
//! request-scoped state into typed extensions:
//!
//! - [`language`]: reads the language cookie and resolves a supported
//!   language id, falling back to the site default
//! - [`identity`]: reads the session cookie and resolves a user, falling
//!   back to the anonymous sentinel
//!
//! Handlers take the results back out with the `Lang` and `CurrentUser`
//! extractors. Routes that require more than a resolved identity add one
//! of the guards from `hamlet_core::guard` per route.
//!
//! # Example
//!
//! ```ignore
//! use hamlet_core::{CurrentUser, Lang};
//!
//! async fn dashboard(Lang(lang): Lang, CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     // user is never absent: anonymous at worst
//! }
//! ```

pub mod identity;
pub mod language;

pub use identity::resolve_user;
pub use language::resolve_language;
