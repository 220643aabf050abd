use std::env;

use anyhow::anyhow;

const DEFAULT_API_BASE: &str = "https://api.netmind.ai/inference-api/openai/v1";
const DEFAULT_MODEL: &str = "meta-llama/Llama-4-Maverick-17B-128E-Instruct";

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub provider_api_key: String,
    pub provider_api_base: String,
    pub model: String,
    pub provider_timeout_secs: u64,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow!("DATABASE_URL not set"))?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET not set"))?;

        let provider_api_key =
            env::var("NETMIND_API_KEY").map_err(|_| anyhow!("NETMIND_API_KEY not set"))?;

        let provider_api_base =
            env::var("PROVIDER_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let model = env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let provider_timeout_secs = env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Ok(AppConfig {
            database_url,
            jwt_secret,
            provider_api_key,
            provider_api_base,
            model,
            provider_timeout_secs,
            bind_addr,
        })
    }
}
