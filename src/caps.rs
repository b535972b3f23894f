//! Capabilities and suggested roles declared by the host itself.
//!
//! These cover the authentication surface. Plugin declarations are
//! collected separately and registered after these, so a plugin can
//! suggest extra capabilities for the `user` role but can never shadow
//! an `auth-*` capability name.

use hamlet_core::catalog::{ROLE_ADMIN, ROLE_ANON, ROLE_USER};
use hamlet_core::{Capability, Role};

/// Capabilities exposed by the host.
pub fn host_capabilities() -> Vec<Capability> {
    vec![
        Capability::new("auth-login", "Allow a user to login"),
        Capability::new("auth-logout", "Allow an already logged-in user to logout"),
        Capability::new("auth-pwd-reset", "Allow a user to reset their own password"),
        Capability::new("auth-user-create", "Create a new user record"),
        Capability::new("auth-user-assign-role", "Assign a role to a user"),
    ]
}

/// Roles suggested for organizing the host capabilities.
pub fn host_suggested_roles() -> Vec<Role> {
    vec![
        Role::new(
            ROLE_ANON,
            "Anonymous",
            "As yet unauthenticated user",
            &["auth-login", "auth-pwd-reset"],
        ),
        Role::new(
            ROLE_USER,
            "User",
            "Already authenticated user",
            &["auth-logout"],
        ),
        Role::new(
            ROLE_ADMIN,
            "Administrator",
            "System administrator",
            &["auth-user-create", "auth-user-assign-role"],
        ),
    ]
}
