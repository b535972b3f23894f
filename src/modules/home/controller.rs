use axum::extract::State;
use axum::response::Html;
use tracing::instrument;

use hamlet_core::view::escape;
use hamlet_core::{AppError, AppState, CurrentUser, Lang, View};

/// GET /home
///
/// The dashboard: one section per registered plugin listing its declared
/// capabilities, with a link wherever a capability has a screen of its
/// own.
#[instrument(skip_all, fields(username = %user.0.username))]
pub async fn home(
    State(state): State<AppState>,
    lang: Lang,
    user: CurrentUser,
) -> Result<Html<String>, AppError> {
    let title = format!("Dashboard | {}", state.site.title);
    let view = View::new("main-home", title)
        .with("username", &user.0.username)
        .with_html("plugins", plugin_sections(&state));
    state.render(&lang, &view)
}

// Markup for the per-plugin dashboard sections. Descriptions come from
// the catalog, which is the registered authority, not from the plugin
// directly.
fn plugin_sections(state: &AppState) -> String {
    let mut html = String::new();
    for plugin in state.registry.iter() {
        html.push_str("<section class=\"plugin\">\n<h2>");
        html.push_str(&escape(plugin.name()));
        html.push_str("</h2>\n<ul>\n");
        for declared in plugin.capabilities() {
            let Some(capability) = state.catalog.capability(&declared.name) else {
                continue;
            };
            html.push_str("<li>");
            match &capability.dashboard {
                Some(dash) => {
                    html.push_str("<a href=\"/");
                    html.push_str(&escape(plugin.name()));
                    html.push('/');
                    html.push_str(&escape(dash));
                    html.push_str("\">");
                    html.push_str(&escape(&capability.description));
                    html.push_str("</a>");
                }
                None => html.push_str(&escape(&capability.description)),
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n</section>\n");
    }
    html
}
