use std::time::Duration;

use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use hamlet::boot::{build_state, plugins, run_plugin_inits, spawn_session_reaper};
use hamlet::config::{BootConfig, site_config};
use hamlet::router::init_router;

/// How long in-flight requests get to finish after a shutdown signal.
const DRAIN_WINDOW: Duration = Duration::from_secs(12);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "info,{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BootConfig::from_env();
    let site = site_config()?;

    info!("db: initializing");
    let options: SqliteConnectOptions = config.database_url.parse()?;
    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options.busy_timeout(Duration::from_secs(3)))
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    info!(database_url = %config.database_url, "db: ready");

    let state = build_state(db.clone(), site, plugins())?;
    run_plugin_inits(&state).await?;
    spawn_session_reaper(db);

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    info!(host = %config.host, port = config.port, "run: server starting");
    println!("🚀 Hamlet running on http://{}", config.listen_addr());

    // The signal that starts graceful shutdown also starts the drain
    // timer; whichever side finishes first ends the process.
    let draining = std::sync::Arc::new(tokio::sync::Notify::new());
    let graceful = {
        let draining = draining.clone();
        async move {
            shutdown_signal().await;
            info!("run: shutdown starting");
            draining.notify_one();
        }
    };
    tokio::select! {
        result = axum::serve(listener, app).with_graceful_shutdown(graceful) => {
            result?;
            info!("run: shutdown complete");
        }
        _ = async { draining.notified().await; tokio::time::sleep(DRAIN_WINDOW).await; } => {
            warn!("run: drain window elapsed, exiting");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
