pub mod imagga; // Imagga image tagging
pub mod usda; // USDA FoodData Central search
#[cfg(test)]
pub mod mock;

pub use imagga::ImaggaClient;
pub use usda::UsdaClient;

use crate::models::{FoodRecord, Tag, UploadedImage};

/// Failure talking to one of the third-party APIs.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} API error ({status}): {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{service} returned an unexpected response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}

/// Image tagging backend (Imagga in production)
#[async_trait::async_trait]
pub trait TaggingService: Send + Sync {
    /// Ranked tags for the image, in the order the backend returned them
    async fn tag(&self, image: &UploadedImage) -> Result<Vec<Tag>, UpstreamError>;
}

/// Nutrition database backend (USDA in production)
#[async_trait::async_trait]
pub trait NutritionService: Send + Sync {
    /// Best match for `query`, or `None` when the database has no entry for it
    async fn search(&self, query: &str) -> Result<Option<FoodRecord>, UpstreamError>;
}

/// Build the shared HTTP client with the configured timeout on every request
pub fn http_client(timeout: std::time::Duration) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(client)
}
