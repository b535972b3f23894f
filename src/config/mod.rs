//! Boot and site configuration for the Hamlet host.
//!
//! Boot parameters (listen address, database location) come from
//! `HAMLET_*` environment variables with sensible defaults. Site identity
//! and the per-language text catalog are assembled from the environment
//! plus an embedded catalog file; a broken catalog aborts startup.

use anyhow::Context;
use hamlet_core::config::TextCatalog;
use hamlet_core::identity::DEFAULT_LANGUAGE;
use hamlet_core::SiteConfig;

const TEXTS_JSON: &str = include_str!("../../web/texts.json");

/// Configuration required before the server can start listening.
#[derive(Clone, Debug)]
pub struct BootConfig {
    /// Host interface to bind, e.g. `0.0.0.0` or `127.0.0.1`
    pub host: String,
    /// Port on the host interface
    pub port: u16,
    /// SQLite connection string
    pub database_url: String,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8642,
            database_url: "sqlite:hamlet.db?mode=rwc".to_string(),
        }
    }
}

impl BootConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HAMLET_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("HAMLET_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8642),
            database_url: std::env::var("HAMLET_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:hamlet.db?mode=rwc".to_string()),
        }
    }

    /// The `host:port` string to bind the listener to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builds the site configuration from the environment and the embedded
/// text catalog.
pub fn site_config() -> anyhow::Result<SiteConfig> {
    let catalog: TextCatalog =
        serde_json::from_str(TEXTS_JSON).context("parse embedded text catalog")?;

    let title = std::env::var("HAMLET_SITE_TITLE").unwrap_or_else(|_| "Ourville".to_string());
    let description = std::env::var("HAMLET_SITE_DESCRIPTION")
        .unwrap_or_else(|_| "A website powered by Hamlet".to_string());
    let default_language = std::env::var("HAMLET_DEFAULT_LANGUAGE")
        .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());

    anyhow::ensure!(
        catalog.languages.iter().any(|l| l.id == default_language),
        "default language {default_language:?} is not in the text catalog"
    );

    Ok(SiteConfig::new(title, description, default_language, catalog))
}
