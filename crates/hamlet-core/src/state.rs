use std::sync::Arc;

use axum::response::Html;
use sqlx::SqlitePool;

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::error::AppError;
use crate::identity::Lang;
use crate::plugin::PluginRegistry;
use crate::view::{Templates, View};

/// Shared application state. Everything except the pool's connections is
/// built before the server starts and immutable afterwards, so handlers
/// clone freely and never lock.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub registry: Arc<PluginRegistry>,
    pub catalog: Arc<Catalog>,
    pub templates: Arc<Templates>,
    pub site: Arc<SiteConfig>,
}

impl AppState {
    /// Renders a view through the compiled templates. A missing view name
    /// is a wiring defect, reported as a generic failure page.
    pub fn render(&self, lang: &Lang, view: &View) -> Result<Html<String>, AppError> {
        match self.templates.render(&self.site, lang, view) {
            Ok(page) => Ok(Html(page)),
            Err(err) => {
                tracing::error!(view = %view.name, error = %err, "render failed");
                Err(AppError::configuration(err))
            }
        }
    }

    /// Renders the shared error page with a message and a back link.
    pub fn render_error(
        &self,
        lang: &Lang,
        msg: &str,
        back_url: &str,
    ) -> Result<Html<String>, AppError> {
        let title = self.site.text(lang.as_str(), "error-title").to_string();
        let view = View::new("main-error", title)
            .with("msg", msg)
            .with("back_url", back_url);
        self.render(lang, &view)
    }
}
