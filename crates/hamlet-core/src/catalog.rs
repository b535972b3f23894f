//! The capability/role catalog.
//!
//! Plugins and the host declare [`Capability`] records (fine-grained
//! permission units) and may suggest [`Role`] records bundling them. The
//! assembled [`Catalog`] is read-only metadata: the capability guard
//! consults it indirectly through the roles attached to a resolved user,
//! and the dashboard uses it for display. There is no persistence and no
//! assignment store behind it.

use std::collections::BTreeMap;

/// Role held by the anonymous sentinel.
pub const ROLE_ANON: &str = "anon";
/// Role held by every authenticated user.
pub const ROLE_USER: &str = "user";
/// Suggested administrative role. Nothing assigns it yet; the capabilities
/// it bundles are unreachable until an assignment surface exists.
pub const ROLE_ADMIN: &str = "admin";

/// A named, fine-grained permission unit. Declared by exactly one
/// contributor; names are unique system-wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub name: String,
    pub description: String,
    /// Path under the owner's URL namespace where this capability has a
    /// screen of its own, if any. Used by the dashboard.
    pub dashboard: Option<String>,
}

impl Capability {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            dashboard: None,
        }
    }

    pub fn with_dashboard(mut self, path: &str) -> Self {
        self.dashboard = Some(path.to_string());
        self
    }
}

/// A named bundle of capabilities suggested for assignment to users.
/// Advisory: holding a role grants its capabilities, but only the two
/// built-in assignments (see [`ROLE_ANON`] and [`ROLE_USER`]) exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Capability names, in presentation order.
    pub capabilities: Vec<String>,
}

impl Role {
    pub fn new(name: &str, display_name: &str, description: &str, capabilities: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn grants(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("capability {name:?} already declared; rejected duplicate from {owner:?}")]
    DuplicateCapability { name: String, owner: String },
}

/// All declared capabilities and suggested roles, keyed by name.
/// Built once at boot, read-only afterwards.
#[derive(Debug, Default)]
pub struct Catalog {
    capabilities: BTreeMap<String, Capability>,
    roles: BTreeMap<String, Role>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one contributor's declarations. Capability names must be
    /// new; a role name already suggested by an earlier contributor keeps
    /// its wording and absorbs the additional capabilities.
    pub fn register(
        &mut self,
        owner: &str,
        capabilities: Vec<Capability>,
        roles: Vec<Role>,
    ) -> Result<(), CatalogError> {
        for capability in capabilities {
            if self.capabilities.contains_key(&capability.name) {
                return Err(CatalogError::DuplicateCapability {
                    name: capability.name,
                    owner: owner.to_string(),
                });
            }
            self.capabilities.insert(capability.name.clone(), capability);
        }
        for role in roles {
            match self.roles.get_mut(&role.name) {
                Some(existing) => {
                    for capability in role.capabilities {
                        if !existing.capabilities.contains(&capability) {
                            existing.capabilities.push(capability);
                        }
                    }
                }
                None => {
                    self.roles.insert(role.name.clone(), role);
                }
            }
        }
        Ok(())
    }

    pub fn capability(&self, name: &str) -> Option<&Capability> {
        self.capabilities.get(name)
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Capabilities in name order.
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.values()
    }

    /// Roles in name order.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_declarations() -> (Vec<Capability>, Vec<Role>) {
        let capabilities = vec![
            Capability::new("auth-login", "Allow a user to login"),
            Capability::new("auth-logout", "Allow an already logged-in user to logout"),
        ];
        let roles = vec![
            Role::new("anon", "Anonymous", "As yet unauthenticated user", &["auth-login"]),
            Role::new("user", "User", "Already authenticated user", &["auth-logout"]),
        ];
        (capabilities, roles)
    }

    #[test]
    fn registers_and_looks_up() {
        let mut catalog = Catalog::new();
        let (capabilities, roles) = host_declarations();
        catalog.register("main", capabilities, roles).unwrap();

        assert_eq!(
            catalog.capability("auth-login").map(|c| c.description.as_str()),
            Some("Allow a user to login")
        );
        assert!(catalog.role("user").unwrap().grants("auth-logout"));
        assert!(!catalog.role("user").unwrap().grants("auth-login"));
        assert!(catalog.capability("nope").is_none());
    }

    #[test]
    fn duplicate_capability_fails_closed() {
        let mut catalog = Catalog::new();
        let (capabilities, roles) = host_declarations();
        catalog.register("main", capabilities, roles).unwrap();

        let err = catalog
            .register("rogue", vec![Capability::new("auth-login", "again")], vec![])
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateCapability {
                name: "auth-login".to_string(),
                owner: "rogue".to_string(),
            }
        );
    }

    #[test]
    fn repeated_role_suggestion_merges_capabilities() {
        let mut catalog = Catalog::new();
        catalog
            .register(
                "main",
                vec![],
                vec![Role::new("user", "User", "Already authenticated user", &["auth-logout"])],
            )
            .unwrap();
        catalog
            .register(
                "directory",
                vec![],
                vec![Role::new("user", "Member", "ignored wording", &["orgs-list", "auth-logout"])],
            )
            .unwrap();

        let role = catalog.role("user").unwrap();
        assert_eq!(role.display_name, "User");
        assert_eq!(role.capabilities, vec!["auth-logout", "orgs-list"]);
    }

    #[test]
    fn iteration_is_name_ordered() {
        let mut catalog = Catalog::new();
        catalog
            .register(
                "tasks",
                vec![Capability::new("responsibility-list", "List organizational responsibilities")],
                vec![],
            )
            .unwrap();
        catalog
            .register(
                "directory",
                vec![
                    Capability::new("orgs-list", "List organizations").with_dashboard("orgs"),
                    Capability::new("person-create", "Create person record"),
                ],
                vec![],
            )
            .unwrap();

        let names: Vec<&str> = catalog.capabilities().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["orgs-list", "person-create", "responsibility-list"]);
        assert_eq!(
            catalog.capability("orgs-list").unwrap().dashboard.as_deref(),
            Some("orgs")
        );
    }
}
