use std::sync::atomic::{AtomicUsize, Ordering};

use super::{NutritionService, TaggingService, UpstreamError};
use crate::models::{FoodRecord, Tag, UploadedImage};

/// Tagging double returning canned tags, or a failure when `tags` is `None`
pub struct MockTaggingClient {
    tags: Option<Vec<Tag>>,
    calls: AtomicUsize,
}

impl MockTaggingClient {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self {
            tags: Some(tags),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            tags: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TaggingService for MockTaggingClient {
    async fn tag(&self, image: &UploadedImage) -> Result<Vec<Tag>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        log::info!("🏷️ Mock tagging {}", image.filename);

        self.tags.clone().ok_or_else(|| UpstreamError::Status {
            service: "MockTagging",
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "invalid credentials".to_string(),
        })
    }
}

/// Nutrition double. `Err` is produced when `fail` is set.
pub struct MockNutritionClient {
    record: Option<FoodRecord>,
    fail: bool,
    queries: std::sync::Mutex<Vec<String>>,
}

impl MockNutritionClient {
    pub fn new(record: Option<FoodRecord>) -> Self {
        Self {
            record,
            fail: false,
            queries: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            record: None,
            fail: true,
            queries: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NutritionService for MockNutritionClient {
    async fn search(&self, query: &str) -> Result<Option<FoodRecord>, UpstreamError> {
        self.queries.lock().unwrap().push(query.to_string());

        if self.fail {
            return Err(UpstreamError::Malformed {
                service: "MockNutrition",
                reason: "missing foods".to_string(),
            });
        }

        Ok(self.record.clone())
    }
}
