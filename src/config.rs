use std::env;

use anyhow::Context;
use dotenvy::dotenv;
use strum::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StoreMode {
    /// Talk to the hosted record store.
    Hosted,
    /// Seeded in-memory store, no credentials needed.
    Demo,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    pub store_mode: StoreMode,
    pub store_base_url: String,
    pub store_project_id: String,
    pub store_public_key: String,

    pub rate_api_per_min: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let store_mode: StoreMode = env::var("STORE_MODE")
            .unwrap_or_else(|_| "hosted".to_string())
            .parse()
            .context("STORE_MODE must be 'hosted' or 'demo'")?;

        let require = |key: &str| -> anyhow::Result<String> {
            if store_mode == StoreMode::Demo {
                return Ok(env::var(key).unwrap_or_default());
            }
            env::var(key).with_context(|| format!("{key} must be set"))
        };

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            store_mode,
            store_base_url: require("STORE_BASE_URL")?,
            store_project_id: require("STORE_PROJECT_ID")?,
            store_public_key: require("STORE_PUBLIC_KEY")?,
            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("RATE_API_PER_MIN must be a number")?,
        })
    }
}
