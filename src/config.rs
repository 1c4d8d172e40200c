use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ALLOWED_ORIGIN: &str = "https://cal-track.vercel.app";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;
const DEFAULT_IMAGGA_API_URL: &str = "https://api.imagga.com";
const DEFAULT_USDA_API_URL: &str = "https://api.nal.usda.gov";

/// Runtime configuration, built once at startup and handed to the services.
#[derive(Debug, Clone)]
pub struct Config {
    pub imagga_api_key: String,
    pub imagga_api_secret: String,
    pub usda_api_key: String,
    pub port: u16,
    pub allowed_origin: HeaderValue,
    pub upstream_timeout: Duration,
    pub imagga_api_url: String,
    pub usda_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source. Missing or blank secrets are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            get(key).with_context(|| format!("{} must be set in .env file", key))
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {}", raw))?,
            None => DEFAULT_PORT,
        };

        let origin = get("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let allowed_origin = HeaderValue::from_str(&origin)
            .with_context(|| format!("ALLOWED_ORIGIN is not a valid origin: {}", origin))?;

        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("UPSTREAM_TIMEOUT_SECS is not a number: {}", raw))?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Self {
            imagga_api_key: required("IMAGGA_API_KEY")?,
            imagga_api_secret: required("IMAGGA_API_SECRET")?,
            usda_api_key: required("USDA_API_KEY")?,
            port,
            allowed_origin,
            upstream_timeout: Duration::from_secs(timeout_secs),
            imagga_api_url: get("IMAGGA_API_URL")
                .unwrap_or_else(|| DEFAULT_IMAGGA_API_URL.to_string()),
            usda_api_url: get("USDA_API_URL")
                .unwrap_or_else(|| DEFAULT_USDA_API_URL.to_string()),
        })
    }
}
