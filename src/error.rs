//! Error taxonomy of the preprocessing pipeline and the inference round-trip.
//! No variant is retried anywhere: every stage fails fast and the error
//! reaches the HTTP boundary unchanged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed base64 or unreadable image bytes
    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("unsupported image dimensions {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    /// A stage received a bitmap that its predecessor should never produce
    #[error("expected a {expected_width}x{expected_height}x1 bitmap, got {width}x{height}x{channels}")]
    ShapeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
        channels: u8,
    },

    #[error("got {predictions} predictions for {classes} classes")]
    IndexOutOfRange { predictions: usize, classes: usize },

    #[error("inference gateway failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Failures talking to the remote inference endpoint
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("cannot reach inference endpoint {0}")]
    Connection(String),

    #[error("inference request timed out after {0}s")]
    Timeout(u64),

    #[error("inference endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("http client error: {0}")]
    HttpClient(String),
}

impl From<base64::DecodeError> for PipelineError {
    fn from(err: base64::DecodeError) -> Self {
        PipelineError::Decode(err.to_string())
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        PipelineError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
