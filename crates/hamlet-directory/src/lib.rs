//! The directory plugin: the organizations & people namespace.
//!
//! Other plugins build on this namespace, so it declares no dependencies
//! of its own and initializes first. Its pages require an authenticated
//! user; record editing lives outside this plugin.

use async_trait::async_trait;
use axum::{Router, extract::State, middleware, response::Html, routing::get};
use hamlet_core::{
    AppError, AppState, Capability, CurrentUser, Lang, Plugin, View, guard::require_user,
};
use include_dir::{Dir, include_dir};
use sqlx::SqlitePool;

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/web");

const SCHEMA: &str = include_str!("../schema.sql");

pub struct DirectoryPlugin;

#[async_trait]
impl Plugin for DirectoryPlugin {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::new("orgs-list", "List organizations").with_dashboard("orgs"),
            Capability::new("person-create", "Create person record")
                .with_dashboard("person/create"),
        ]
    }

    fn assets(&self) -> &'static Dir<'static> {
        &ASSETS
    }

    fn routes(&self) -> Router<AppState> {
        Router::new()
            .route("/", get(root))
            .route("/orgs", get(orgs))
            .route_layer(middleware::from_fn(require_user))
    }

    async fn init(&self, pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::raw_sql(SCHEMA).execute(pool).await?;
        tracing::info!("directory: ready");
        Ok(())
    }
}

async fn root(
    State(state): State<AppState>,
    lang: Lang,
    current: CurrentUser,
) -> Result<Html<String>, AppError> {
    let view = View::new("directory-root", "Directory").with("username", &current.0.username);
    state.render(&lang, &view)
}

async fn orgs(State(state): State<AppState>, lang: Lang) -> Result<Html<String>, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM org")
        .fetch_one(&state.db)
        .await?;
    let view = View::new("directory-orgs", "Organizations").with("count", &count.to_string());
    state.render(&lang, &view)
}
