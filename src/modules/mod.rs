//! Feature modules of the Hamlet host.
//!
//! - [`auth`]: login and logout atop the session store
//! - [`home`]: authenticated dashboard
//! - [`lang`]: language preference switch
//! - [`root`]: public landing page

pub mod auth;
pub mod home;
pub mod lang;
pub mod root;
