use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Form body of `POST /predict`: a base64 image, optionally as a data URL
#[derive(Deserialize)]
pub struct PredictForm {
    pub image: String,
}

impl Debug for PredictForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PredictForm {{ image: <{} bytes> }}", self.image.len())
    }
}

/// Most likely class names, most likely first
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub result: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub target_size: u32,
    pub classes: usize,
    pub top_k: usize,
    pub gateway: String,
}
