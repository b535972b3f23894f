//! Boot-time assembly: plugins into a registry, declarations into the
//! catalog, embedded views into compiled templates, all of it into one
//! immutable [`AppState`]. Any conflict detected here aborts startup.

use std::sync::Arc;

use anyhow::Context;
use sqlx::SqlitePool;
use tracing::{error, info};

use hamlet_core::view::collect_views;
use hamlet_core::{AppState, Catalog, Plugin, PluginRegistry, SiteConfig, Templates};

use crate::assets::ASSETS;
use crate::caps::{host_capabilities, host_suggested_roles};
use crate::modules::auth::service::{AuthService, SESSION_MAX_AGE_SECS};

/// Namespace for the host's own views and capability declarations.
const HOST_NAMESPACE: &str = "main";

/// The plugins compiled into this host.
pub fn plugins() -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(hamlet_directory::DirectoryPlugin),
        Arc::new(hamlet_tasks::TasksPlugin),
    ]
}

/// Builds the shared application state. The host's capabilities register
/// first, so no plugin can shadow an `auth-*` name.
pub fn build_state(
    db: SqlitePool,
    site: SiteConfig,
    plugins: Vec<Arc<dyn Plugin>>,
) -> anyhow::Result<AppState> {
    let registry = PluginRegistry::new(plugins).context("register plugins")?;

    let mut catalog = Catalog::new();
    catalog
        .register(HOST_NAMESPACE, host_capabilities(), host_suggested_roles())
        .context("register host capabilities")?;
    for plugin in registry.iter() {
        catalog
            .register(plugin.name(), plugin.capabilities(), plugin.suggested_roles())
            .with_context(|| format!("register capabilities of plugin {:?}", plugin.name()))?;
    }

    let layout = ASSETS
        .get_file("layout.html")
        .and_then(|file| file.contents_utf8())
        .context("layout.html missing from embedded assets")?;
    let mut views = collect_views(HOST_NAMESPACE, &ASSETS).context("collect host views")?;
    for plugin in registry.iter() {
        views.extend(
            collect_views(plugin.name(), plugin.assets())
                .with_context(|| format!("collect views of plugin {:?}", plugin.name()))?,
        );
    }
    let templates = Templates::build(layout, views).context("compile templates")?;

    info!(
        plugins = registry.len(),
        views = templates.len(),
        "boot: state assembled"
    );

    Ok(AppState {
        db,
        registry: Arc::new(registry),
        catalog: Arc::new(catalog),
        templates: Arc::new(templates),
        site: Arc::new(site),
    })
}

/// Runs every plugin's init hook, dependencies first.
pub async fn run_plugin_inits(state: &AppState) -> anyhow::Result<()> {
    for plugin in state.registry.init_order() {
        plugin
            .init(&state.db)
            .await
            .with_context(|| format!("init plugin {:?}", plugin.name()))?;
    }
    Ok(())
}

/// Spawns the hourly sweep that drops sessions idle past the cookie
/// max-age. The first sweep runs at spawn, which also clears anything
/// left over from before a restart.
pub fn spawn_session_reaper(db: SqlitePool) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
        loop {
            ticker.tick().await;
            match AuthService::reap_stale_sessions(&db, SESSION_MAX_AGE_SECS).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "session reaper: stale sessions dropped"),
                Err(err) => error!(error = %err, "session reaper: sweep failed"),
            }
        }
    });
}
