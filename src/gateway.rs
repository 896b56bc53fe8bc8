//! Client side of the remote classification model.
//!
//! The model is served behind a REST `predict` endpoint (TensorFlow Serving
//! and Vertex AI both speak this dialect): the request body is
//! `{"instances": <tensor as nested lists>}` and the response carries one
//! probability vector per instance under `predictions`. There is one
//! round-trip per request and no retry.

use crate::error::GatewayError;
use crate::preprocess::NormalizedTensor;
use crate::settings::GatewaySettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// One probability per class, index-aligned with `ClassNames`
pub type PredictionVector = Vec<f64>;

/// Anything that can turn a model input tensor into class probabilities
pub trait InferenceGateway: Send + Sync {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<PredictionVector, GatewayError>;

    /// Human readable location of the model, for logs and status
    fn endpoint(&self) -> &str;
}

/// Request body for `POST <endpoint>`
#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: &'a NormalizedTensor,
}

/// Response body of `POST <endpoint>`
#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<PredictionVector>,
}

/// Blocking HTTP client for a REST prediction endpoint. Call it from a
/// blocking context (e.g. `actix_web::web::block`), never on an async worker
#[derive(Debug)]
pub struct HttpGateway {
    endpoint: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpGateway {
    pub fn new(
        endpoint: &str,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GatewayError::HttpClient(e.to_string()))?;

        Ok(HttpGateway {
            endpoint: endpoint.to_string(),
            token,
            client,
            timeout_secs,
        })
    }

    pub fn from_settings(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        HttpGateway::new(
            &settings.endpoint,
            settings.token.clone(),
            settings.timeout_secs,
        )
    }
}

impl InferenceGateway for HttpGateway {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<PredictionVector, GatewayError> {
        debug!(endpoint = %self.endpoint, shape = ?tensor.shape(), "sending inference request");

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&PredictRequest { instances: tensor });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                GatewayError::Connection(self.endpoint.clone())
            } else {
                GatewayError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| GatewayError::HttpClient(e.to_string()))?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_predictions(&body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Extract the probability vector of the first (only) instance
pub(crate) fn parse_predictions(body: &str) -> Result<PredictionVector, GatewayError> {
    let response: PredictResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
    response
        .predictions
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::MalformedResponse("no predictions in response".into()))
}
