use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Dotenv file consulted before the process environment, matching the
/// deployment layout where credentials live outside the checkout.
const ENV_FILE: &str = "/etc/sous/web.env";

/// Application configuration loaded from environment variables.
///
/// Built once in `main`, which hands each client the settings it needs;
/// request handlers never read the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the Gemini API, resolved at startup.
    pub gemini_api_key: String,
    /// Programmable Search engine id. Related recipes fall back to site
    /// scraping when this pair is unset.
    pub search_engine_id: Option<String>,
    pub search_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

/// The fields of a service-account key file we care about. `token` is the
/// bearer some deployments bake into the JSON document Google hands out.
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    client_email: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    /// Fails fast when no usable Gemini credential can be resolved.
    pub fn from_env() -> Result<Self> {
        dotenvy::from_path(ENV_FILE).ok(); // fixed deployment path; absent in dev
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: resolve_gemini_key()?,
            search_engine_id: optional_env("GOOGLE_CSE_ID"),
            search_api_key: optional_env("GOOGLE_CSE_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the Gemini bearer credential: `GEMINI_API_KEY` wins, otherwise the
/// service-account key file named by `GOOGLE_APPLICATION_CREDENTIALS` must
/// carry a `token` field. Authentication happens once, here, never per request.
fn resolve_gemini_key() -> Result<String> {
    if let Some(key) = optional_env("GEMINI_API_KEY") {
        return Ok(key);
    }

    let path = std::env::var("GOOGLE_APPLICATION_CREDENTIALS")
        .context("neither GEMINI_API_KEY nor GOOGLE_APPLICATION_CREDENTIALS is set")?;
    read_key_file(Path::new(&path))
}

fn read_key_file(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read service account key {}", path.display()))?;
    let key: ServiceAccountKey = serde_json::from_str(&raw)
        .with_context(|| format!("invalid service account key {}", path.display()))?;

    key.token.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
        let account = key
            .client_email
            .unwrap_or_else(|| "unknown account".to_string());
        anyhow::anyhow!("service account key for {account} carries no token; set GEMINI_API_KEY instead")
    })
}
