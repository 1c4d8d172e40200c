use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        DefaultBodyLimit, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::handlers::{AnalysisError, AnalysisHandler};
use crate::models::{FailureResponse, UploadedImage};

/// Largest accepted image file
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
// Room for boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
const IMAGE_FIELD: &str = "foodImage";

pub struct AppState {
    pub analysis_handler: Arc<AnalysisHandler>,
}

pub fn create_router(analysis_handler: Arc<AnalysisHandler>, allowed_origin: HeaderValue) -> Router {
    let state = Arc::new(AppState { analysis_handler });

    // Other origins get no allow-origin header at all
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([allowed_origin]))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES))
        .layer(cors)
        .with_state(state)
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    log::info!("📨 Received image analysis request");

    let image = match multipart {
        Ok(multipart) => match read_image(multipart).await {
            Ok(image) => image,
            Err(e) => return e.into_response(),
        },
        // Not a multipart body at all, so there is no file to analyze
        Err(rejection) => {
            log::warn!("⚠️ Request is not multipart: {}", rejection.body_text());
            None
        }
    };

    match state.analysis_handler.analyze(image).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Pull the `foodImage` file out of the form, skipping any other fields.
async fn read_image(mut multipart: Multipart) -> Result<Option<UploadedImage>, AnalysisError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            log::debug!("Skipping form field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(upload_error)?;

        if data.len() > MAX_UPLOAD_BYTES {
            log::warn!("⚠️ Rejecting {} ({} bytes): too large", filename, data.len());
            return Err(AnalysisError::PayloadTooLarge(MAX_UPLOAD_BYTES));
        }
        // Browsers send an empty part when the file input was left blank
        if data.is_empty() {
            return Ok(None);
        }

        log::debug!("📊 Image file size: {} bytes", data.len());
        return Ok(Some(UploadedImage {
            data,
            filename,
            content_type,
        }));
    }

    Ok(None)
}

fn upload_error(err: MultipartError) -> AnalysisError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AnalysisError::PayloadTooLarge(MAX_UPLOAD_BYTES)
    } else {
        AnalysisError::InvalidUpload(err.body_text())
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = match &self {
            AnalysisError::MissingInput
            | AnalysisError::InvalidUpload(_)
            | AnalysisError::NotFood => StatusCode::BAD_REQUEST,
            AnalysisError::NoNutritionData(_) => StatusCode::NOT_FOUND,
            AnalysisError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AnalysisError::Upstream(e) => {
                log::error!("❌ Analysis failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(FailureResponse::new(self.user_message()))).into_response()
    }
}

async fn root_handler() -> Html<&'static str> {
    Html(
        "<h1>Cal Track Backend is running!</h1>\
         <p>This server is waiting for image analysis requests from the frontend.</p>",
    )
}

async fn health_check() -> &'static str {
    "OK"
}
