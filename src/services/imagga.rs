use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{TaggingService, UpstreamError};
use crate::models::{Tag, UploadedImage};

const SERVICE: &str = "Imagga";
const TAG_LIMIT: u32 = 5;

#[derive(Debug, Deserialize)]
struct TagsResponse {
    result: Option<TagsResult>,
}

#[derive(Debug, Deserialize)]
struct TagsResult {
    tags: Option<Vec<ImaggaTag>>,
}

#[derive(Debug, Deserialize)]
struct ImaggaTag {
    confidence: f64,
    tag: TagName,
}

#[derive(Debug, Deserialize)]
struct TagName {
    en: String,
}

/// Imagga v2 tagging API client
pub struct ImaggaClient {
    api_key: String,
    api_secret: String,
    base_url: String,
    client: reqwest::Client,
}

impl ImaggaClient {
    pub fn new(
        api_key: String,
        api_secret: String,
        base_url: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key,
            api_secret,
            base_url,
            client,
        }
    }

    fn tags_url(&self) -> String {
        format!("{}/v2/tags", self.base_url.trim_end_matches('/'))
    }

    fn parse_tags(body: &str) -> Result<Vec<Tag>, UpstreamError> {
        let response: TagsResponse =
            serde_json::from_str(body).map_err(|e| UpstreamError::Malformed {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        let tags = response
            .result
            .and_then(|r| r.tags)
            .ok_or_else(|| UpstreamError::Malformed {
                service: SERVICE,
                reason: "missing result.tags".to_string(),
            })?;

        Ok(tags
            .into_iter()
            .map(|t| Tag::new(t.tag.en, t.confidence))
            .collect())
    }
}

#[async_trait::async_trait]
impl TaggingService for ImaggaClient {
    async fn tag(&self, image: &UploadedImage) -> Result<Vec<Tag>, UpstreamError> {
        let transport = |source: reqwest::Error| UpstreamError::Transport {
            service: SERVICE,
            source,
        };

        // `Bytes` clones share the buffer, the image itself is never copied
        let image_part = || {
            Part::stream_with_length(image.data.clone(), image.data.len() as u64)
                .file_name(image.filename.clone())
        };
        // Imagga sniffs the type itself, so an unparseable hint is just dropped
        let part = match image_part().mime_str(&image.content_type) {
            Ok(part) => part,
            Err(_) => image_part(),
        };
        let form = Form::new().part("image", part);

        log::info!("🏷️ Sending {} ({} bytes) to Imagga", image.filename, image.data.len());

        let response = self
            .client
            .post(self.tags_url())
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&[("limit", TAG_LIMIT)])
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        log::debug!("📥 Imagga response status: {}", status);

        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            log::error!("❌ Imagga API error response: {}", body);
            return Err(UpstreamError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        let tags = Self::parse_tags(&body)?;
        log::info!(
            "🏷️ Imagga tags: {:?}",
            tags.iter().map(|t| t.label.as_str()).collect::<Vec<_>>()
        );

        Ok(tags)
    }
}
