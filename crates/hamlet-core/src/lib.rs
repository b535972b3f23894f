//! # Hamlet Core
//!
//! Everything a plugin needs to compile against the Hamlet host:
//!
//! - [`plugin`]: the [`Plugin`] contract and the boot-time [`PluginRegistry`]
//! - [`catalog`]: capability and role declarations
//! - [`identity`]: per-request user/language context and the audit record
//! - [`guard`]: the anonymous-rejection and capability route guards
//! - [`view`]: embedded view shells compiled into a [`Templates`] registry
//! - [`state`]: the shared [`AppState`] handed to every router
//! - [`error`]: the [`AppError`] taxonomy with HTTP response conversion
//! - [`config`]: site identity, languages, and the text catalog
//!
//! # Example
//!
//! ```ignore
//! use hamlet_core::{AppError, AppState, CurrentUser, Lang, View};
//!
//! async fn dashboard(
//!     state: AppState,
//!     lang: Lang,
//!     user: CurrentUser,
//! ) -> Result<axum::response::Html<String>, AppError> {
//!     let view = View::new("directory-home", "Directory").with("who", &user.0.username);
//!     state.render(&lang, &view)
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod guard;
pub mod identity;
pub mod plugin;
pub mod state;
pub mod view;

// Re-export the types plugins touch on almost every page.
pub use catalog::{Capability, Catalog, Role};
pub use config::SiteConfig;
pub use error::{AppError, ErrorKind};
pub use identity::{Access, CurrentUser, Lang, User};
pub use plugin::{Plugin, PluginRegistry};
pub use state::AppState;
pub use view::{Templates, View, escape};
