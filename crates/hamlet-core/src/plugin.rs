//! The plugin contract and the boot-time registry.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use include_dir::Dir;
use sqlx::SqlitePool;

use crate::catalog::{Capability, Role};
use crate::state::AppState;

/// Contract every feature module implements to join the host.
///
/// A plugin's name doubles as its URL namespace: its router is mounted at
/// `/{name}` and its embedded static files are served under `/a/{name}/`.
/// Identity is fixed at registration; whatever state a plugin manages
/// behind its routes is its own concern.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique name. Also the URL namespace.
    fn name(&self) -> &'static str;

    /// Names of plugins that must initialize before this one.
    fn dependencies(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Capabilities contributed to the catalog.
    fn capabilities(&self) -> Vec<Capability>;

    /// Roles suggested for bundling this plugin's capabilities.
    fn suggested_roles(&self) -> Vec<Role> {
        Vec::new()
    }

    /// Embedded source tree with `views/` (template shells) and `static/`
    /// (files served under `/a/{name}/`).
    fn assets(&self) -> &'static Dir<'static>;

    /// Routes mounted at `/{name}`. Paths inside are written against `/`;
    /// the prefix is stripped before delegation.
    fn routes(&self) -> Router<AppState>;

    /// One-time setup, run after host migrations in dependency order.
    /// Failure aborts startup.
    async fn init(&self, pool: &SqlitePool) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("plugin name {0:?} registered more than once")]
    DuplicateName(String),
    #[error("plugin {plugin:?} depends on unknown plugin {dependency:?}")]
    UnknownDependency { plugin: String, dependency: String },
    #[error("dependency cycle among plugins {0:?}")]
    Cycle(Vec<String>),
}

/// All registered plugins with a precomputed initialization order.
/// Populated once at boot, read-only afterwards.
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
    by_name: BTreeMap<&'static str, usize>,
    init_order: Vec<usize>,
}

impl PluginRegistry {
    /// Registers the given plugins. Duplicate names fail closed, and the
    /// declared dependencies are resolved into a deterministic
    /// initialization order up front.
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Result<Self, RegistryError> {
        let mut by_name = BTreeMap::new();
        for (idx, plugin) in plugins.iter().enumerate() {
            if by_name.insert(plugin.name(), idx).is_some() {
                return Err(RegistryError::DuplicateName(plugin.name().to_string()));
            }
        }
        let init_order = init_order(&plugins, &by_name)?;
        Ok(Self {
            plugins,
            by_name,
            init_order,
        })
    }

    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.by_name.get(name).map(|&idx| self.plugins[idx].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Plugins in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.by_name.values().map(|&idx| self.plugins[idx].as_ref())
    }

    /// Plugins in dependency order, dependencies first. Ties break by name.
    pub fn init_order(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.init_order.iter().map(|&idx| self.plugins[idx].as_ref())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

// Kahn's algorithm with a name-ordered ready set, so the order is stable
// across runs and independent of registration order.
fn init_order(
    plugins: &[Arc<dyn Plugin>],
    by_name: &BTreeMap<&'static str, usize>,
) -> Result<Vec<usize>, RegistryError> {
    let mut indegree = vec![0usize; plugins.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); plugins.len()];
    for (idx, plugin) in plugins.iter().enumerate() {
        for dependency in plugin.dependencies() {
            let &dep_idx =
                by_name
                    .get(dependency)
                    .ok_or_else(|| RegistryError::UnknownDependency {
                        plugin: plugin.name().to_string(),
                        dependency: dependency.to_string(),
                    })?;
            indegree[idx] += 1;
            dependents[dep_idx].push(idx);
        }
    }

    let mut ready: BTreeSet<(&str, usize)> = plugins
        .iter()
        .enumerate()
        .filter(|&(idx, _)| indegree[idx] == 0)
        .map(|(idx, plugin)| (plugin.name(), idx))
        .collect();
    let mut order = Vec::with_capacity(plugins.len());
    while let Some((_, idx)) = ready.pop_first() {
        order.push(idx);
        for &dependent in &dependents[idx] {
            indegree[dependent] -= 1;
            if indegree[dependent] == 0 {
                ready.insert((plugins[dependent].name(), dependent));
            }
        }
    }

    if order.len() != plugins.len() {
        let mut stuck: Vec<String> = plugins
            .iter()
            .enumerate()
            .filter(|&(idx, _)| indegree[idx] > 0)
            .map(|(_, plugin)| plugin.name().to_string())
            .collect();
        stuck.sort();
        return Err(RegistryError::Cycle(stuck));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    static NO_ASSETS: Dir<'static> = Dir::new("", &[]);

    struct TestPlugin {
        name: &'static str,
        dependencies: Vec<&'static str>,
    }

    #[async_trait]
    impl Plugin for TestPlugin {
        fn name(&self) -> &'static str {
            self.name
        }

        fn dependencies(&self) -> Vec<&'static str> {
            self.dependencies.clone()
        }

        fn capabilities(&self) -> Vec<Capability> {
            Vec::new()
        }

        fn assets(&self) -> &'static Dir<'static> {
            &NO_ASSETS
        }

        fn routes(&self) -> Router<AppState> {
            Router::new()
        }

        async fn init(&self, _pool: &SqlitePool) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn plugin(name: &'static str, dependencies: &[&'static str]) -> Arc<dyn Plugin> {
        Arc::new(TestPlugin {
            name,
            dependencies: dependencies.to_vec(),
        })
    }

    fn order_of(registry: &PluginRegistry) -> Vec<&str> {
        registry.init_order().map(|p| p.name()).collect()
    }

    #[test]
    fn dependencies_initialize_first() {
        let registry =
            PluginRegistry::new(vec![plugin("tasks", &["directory"]), plugin("directory", &[])])
                .unwrap();
        assert_eq!(order_of(&registry), vec!["directory", "tasks"]);
    }

    #[test]
    fn independent_plugins_order_by_name() {
        let registry = PluginRegistry::new(vec![
            plugin("wiki", &[]),
            plugin("directory", &[]),
            plugin("tasks", &[]),
        ])
        .unwrap();
        assert_eq!(order_of(&registry), vec!["directory", "tasks", "wiki"]);
    }

    #[test]
    fn shared_dependency_runs_once_and_first() {
        let registry = PluginRegistry::new(vec![
            plugin("wiki", &["directory"]),
            plugin("tasks", &["directory", "wiki"]),
            plugin("directory", &[]),
        ])
        .unwrap();
        assert_eq!(order_of(&registry), vec!["directory", "wiki", "tasks"]);
    }

    #[test]
    fn duplicate_name_fails_closed() {
        let err = PluginRegistry::new(vec![plugin("tasks", &[]), plugin("tasks", &[])])
            .err()
            .unwrap();
        assert_eq!(err, RegistryError::DuplicateName("tasks".to_string()));
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let err = PluginRegistry::new(vec![plugin("tasks", &["directory"])])
            .err()
            .unwrap();
        assert_eq!(
            err,
            RegistryError::UnknownDependency {
                plugin: "tasks".to_string(),
                dependency: "directory".to_string(),
            }
        );
    }

    #[test]
    fn dependency_cycle_is_rejected() {
        let err = PluginRegistry::new(vec![
            plugin("a", &["b"]),
            plugin("b", &["a"]),
            plugin("standalone", &[]),
        ])
        .err()
        .unwrap();
        assert_eq!(err, RegistryError::Cycle(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn lookup_by_name() {
        let registry = PluginRegistry::new(vec![plugin("directory", &[])]).unwrap();
        assert!(registry.contains("directory"));
        assert!(registry.get("directory").is_some());
        assert!(registry.get("tasks").is_none());
        assert_eq!(registry.len(), 1);
    }
}
