use base64::{engine::general_purpose, Engine};
use std::sync::Arc;

use crate::handlers::{classifier, nutrients};
use crate::models::{NutritionSummary, UploadedImage};
use crate::services::{NutritionService, TaggingService, UpstreamError};

/// Terminal outcomes of an analysis request other than success
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("No image file found")]
    MissingInput,
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
    #[error("Uploaded image exceeds the {0} byte limit")]
    PayloadTooLarge(usize),
    #[error("No food detected in this image")]
    NotFood,
    #[error("No nutrition data found for '{0}'")]
    NoNutritionData(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AnalysisError {
    /// Message safe to return to the caller. Upstream details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Upstream(_) => {
                "Something went wrong while analyzing the image, please try again".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub struct AnalysisHandler {
    tagging: Arc<dyn TaggingService>,
    nutrition: Arc<dyn NutritionService>,
}

impl AnalysisHandler {
    pub fn new(tagging: Arc<dyn TaggingService>, nutrition: Arc<dyn NutritionService>) -> Self {
        Self { tagging, nutrition }
    }

    /// Run the tag → classify → lookup → extract pipeline. The first failing step ends it.
    pub async fn analyze(
        &self,
        image: Option<UploadedImage>,
    ) -> Result<NutritionSummary, AnalysisError> {
        let image = image.ok_or(AnalysisError::MissingInput)?;
        log::info!(
            "📸 Analyzing {} ({}, {} bytes)",
            image.filename,
            image.content_type,
            image.data.len()
        );

        let tags = self.tagging.tag(&image).await?;

        let food_name = match classifier::classify(&tags) {
            Some(label) => label.to_string(),
            None => {
                log::info!("🚫 Tags do not describe food, rejecting");
                return Err(AnalysisError::NotFood);
            }
        };
        log::info!("🍽️ Detected food: {}", food_name);

        let record = match self.nutrition.search(&food_name).await? {
            Some(record) => record,
            None => {
                log::info!("🤷 No nutrition data for: {}", food_name);
                return Err(AnalysisError::NoNutritionData(food_name));
            }
        };

        let n = &record.nutrients;
        let summary = NutritionSummary {
            success: true,
            calories: nutrients::extract(n, "Energy", "kcal"),
            protein: nutrients::extract(n, "Protein", "g"),
            carbs: nutrients::extract(n, "Carbohydrate, by difference", "g"),
            fat: nutrients::extract(n, "Total lipid (fat)", "g"),
            sugar: nutrients::extract(n, "Sugars, total including NLEA", "g"),
            sodium: nutrients::extract(n, "Sodium, Na", "mg"),
            image_src: data_url(&image),
            name: record.description,
        };

        log::info!("✅ Analysis complete: {} ({})", summary.name, summary.calories);
        Ok(summary)
    }
}

fn data_url(image: &UploadedImage) -> String {
    let encoded = general_purpose::STANDARD.encode(&image.data);
    log::debug!("🔄 Base64 encoded size: {} bytes", encoded.len());
    format!("data:{};base64,{}", image.content_type, encoded)
}
