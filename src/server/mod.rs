//! The user-facing web server. It accepts base64 images, runs them through
//! the preprocessing pipeline, asks the inference gateway for probabilities
//! and answers with the most likely class names.

use crate::classify;
use crate::error::PipelineError;
use crate::gateway::InferenceGateway;
use crate::labels::ClassNames;
use crate::preprocess::Preprocessor;
use actix_web::error::BlockingError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use std::collections::HashMap;
use std::sync::Arc;

mod protocol;
pub mod routes;

pub use protocol::{PredictForm, PredictResponse, StatusResponse};

/// Shared, read-only state of every worker
pub struct AppState {
    preprocessor: Preprocessor,
    classes: Arc<ClassNames>,
    gateway: Arc<dyn InferenceGateway>,
    top_k: usize,
}

impl AppState {
    pub fn new(
        preprocessor: Preprocessor,
        classes: Arc<ClassNames>,
        gateway: Arc<dyn InferenceGateway>,
        top_k: usize,
    ) -> Self {
        AppState {
            preprocessor,
            classes,
            gateway,
            top_k,
        }
    }

    /// Preprocess, infer and rank, end to end. Blocks on the gateway
    pub fn classify(&self, raw: &str) -> Result<Vec<String>, PipelineError> {
        let tensor = self.preprocessor.run(raw)?;
        let predictions = self.gateway.predict(&tensor)?;
        let labels = classify::top_k(&predictions, &self.classes, self.top_k)?;
        Ok(labels.into_iter().map(String::from).collect())
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            target_size: self.preprocessor.target_size(),
            classes: self.classes.len(),
            top_k: self.top_k,
            gateway: self.gateway.endpoint().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct WebError {
    status: StatusCode,
    message: String,
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl actix_web::error::ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let err = HashMap::from([("errors", vec![self.to_string()])]);

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(err)
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl From<PipelineError> for WebError {
    fn from(err: PipelineError) -> WebError {
        let status = match &err {
            PipelineError::Decode(_) | PipelineError::UnsupportedDimensions { .. } => {
                StatusCode::BAD_REQUEST
            }
            PipelineError::ShapeMismatch { .. } | PipelineError::IndexOutOfRange { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PipelineError::Gateway(_) => StatusCode::BAD_GATEWAY,
        };
        WebError {
            status,
            message: err.to_string(),
        }
    }
}

impl From<BlockingError> for WebError {
    fn from(err: BlockingError) -> Self {
        WebError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}
