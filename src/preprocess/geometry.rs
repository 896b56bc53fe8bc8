//! Spatial normalization: every bitmap is stretched to a square of the
//! model's input size. Aspect ratio is not preserved: the
//! model was trained on stretched inputs.

use super::Bitmap;
use crate::error::{PipelineError, Result};
use image::imageops::{self, FilterType};

/// Antialiasing filter used for every resize
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Resize (stretch) a bitmap to `target x target`. The channel layout is kept
pub fn resize_and_filter(bitmap: &Bitmap, target: u32) -> Result<Bitmap> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(PipelineError::UnsupportedDimensions { width, height });
    }

    let resized = match bitmap {
        Bitmap::Rgb(img) => Bitmap::Rgb(imageops::resize(img, target, target, RESAMPLE_FILTER)),
        Bitmap::Gray(img) => {
            Bitmap::Gray(imageops::resize(img, target, target, RESAMPLE_FILTER))
        }
    };
    Ok(resized)
}
