//! # Hamlet
//!
//! A modular web host: independent feature plugins share one router, one
//! session store, and one capability catalog, and the host glues them
//! together behind a single server-rendered site.
//!
//! ## Overview
//!
//! The host owns the cross-cutting machinery:
//!
//! - **Authentication**: session-cookie login and global logout backed by
//!   a pooled SQLite session store
//! - **Identity chain**: per-request middleware resolving a language and a
//!   user (anonymous at worst) into typed request state
//! - **Capability catalog**: named permissions and suggested roles,
//!   declared by the host and every plugin at boot
//! - **Composite router**: host pages plus one prefix-stripped router and
//!   one asset namespace per plugin
//!
//! Feature plugins implement the [`hamlet_core::Plugin`] contract and live
//! in their own crates; this crate compiles in the directory and tasks
//! plugins.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── assets.rs         # Embedded host assets and the /a/ route
//! ├── boot.rs           # State assembly and plugin initialization
//! ├── caps.rs           # Host capability and role declarations
//! ├── cli/              # CLI commands (user add)
//! ├── config/           # Boot and site configuration
//! ├── logging.rs        # Request logging middleware
//! ├── middleware/       # Language and identity resolution
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Login and logout
//! │   ├── home/        # Authenticated dashboard
//! │   ├── lang/        # Language switch
//! │   └── root/        # Public landing page
//! ├── router.rs         # Main application router
//! └── utils/            # Shared utilities (passwords, tokens)
//! ```
//!
//! Each feature module follows a consistent structure: `router.rs` for the
//! route table, `controller.rs` for HTTP handlers, `service.rs` for
//! storage-backed logic, `model.rs` for row and form types.
//!
//! ## Quick start
//!
//! ```bash
//! HAMLET_DATABASE_URL=sqlite:hamlet.db?mode=rwc cargo run --bin hamlet
//! cargo run --bin hamlet-cli -- user add alice
//! ```
//!
//! Accounts exist only through the CLI; the web surface has no
//! self-registration.

pub mod assets;
pub mod boot;
pub mod caps;
pub mod cli;
pub mod config;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod utils;

// Re-export workspace crates for convenience
pub use hamlet_core;
pub use hamlet_directory;
pub use hamlet_tasks;
