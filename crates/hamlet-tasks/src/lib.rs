//! The tasks plugin: organizational responsibilities.
//!
//! Responsibilities attach to organizations, so this plugin depends on
//! `directory` and its init runs after the directory schema exists. The
//! root page is public.

use async_trait::async_trait;
use axum::{Router, extract::State, response::Html, routing::get};
use hamlet_core::{AppError, AppState, Capability, Lang, Plugin, View};
use include_dir::{Dir, include_dir};
use sqlx::SqlitePool;

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/web");

pub struct TasksPlugin;

#[async_trait]
impl Plugin for TasksPlugin {
    fn name(&self) -> &'static str {
        "tasks"
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["directory"]
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![Capability::new(
            "responsibility-list",
            "List organizational responsibilities",
        )]
    }

    fn assets(&self) -> &'static Dir<'static> {
        &ASSETS
    }

    fn routes(&self) -> Router<AppState> {
        Router::new().route("/", get(root))
    }

    async fn init(&self, pool: &SqlitePool) -> anyhow::Result<()> {
        // Responsibilities hang off org records; proves the directory
        // schema is in place before any page links into it.
        let orgs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM org")
            .fetch_one(pool)
            .await?;
        tracing::info!(orgs, "tasks: loaded");
        Ok(())
    }
}

async fn root(State(state): State<AppState>, lang: Lang) -> Result<Html<String>, AppError> {
    state.render(&lang, &View::new("tasks-root", "Our Responsibilities"))
}
