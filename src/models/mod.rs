use axum::body::Bytes;
use serde::Serialize;

/// Candidate label returned by the image tagging service.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub label: String,
    pub confidence: f64,  // 0-100
}

impl Tag {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutrientEntry {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

impl NutrientEntry {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
        }
    }
}

/// A single nutrition database entry
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRecord {
    pub description: String,
    pub nutrients: Vec<NutrientEntry>,
}

/// Image file as it arrived in the upload form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub success: bool,
    pub name: String,
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub sugar: String,
    pub sodium: String,
    pub image_src: String,  // data:<mime>;base64,<bytes>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
