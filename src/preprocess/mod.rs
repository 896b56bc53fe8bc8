//! The deterministic preprocessing pipeline. A raw base64 payload goes
//! through four stages, strictly in this order:
//!
//! decode -> resize and filter -> invert and grayscale -> tensor
//!
//! Each stage consumes the previous stage's bitmap by reference and
//! produces a new one. `Preprocessor` drives the stages as a linear state
//! machine; any stage error aborts the run and is returned unchanged.

use crate::config::TARGET_SIZE;
use crate::error::Result;
use image::{DynamicImage, GrayImage, RgbImage};
use tracing::debug;

pub mod decode;
pub mod geometry;
pub mod tensor;
pub mod tone;

pub use decode::decode;
pub use geometry::resize_and_filter;
pub use tensor::{to_tensor, NormalizedTensor};
pub use tone::normalize_tone;

/// An in-memory decoded image. Alpha is never carried
#[derive(Debug, Clone, PartialEq)]
pub enum Bitmap {
    Rgb(RgbImage),
    Gray(GrayImage),
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Bitmap::Rgb(img) => img.dimensions(),
            Bitmap::Gray(img) => img.dimensions(),
        }
    }

    /// Number of channels per pixel
    pub fn channels(&self) -> u8 {
        match self {
            Bitmap::Rgb(_) => 3,
            Bitmap::Gray(_) => 1,
        }
    }

    pub fn to_dynamic(&self) -> DynamicImage {
        match self {
            Bitmap::Rgb(img) => DynamicImage::ImageRgb8(img.clone()),
            Bitmap::Gray(img) => DynamicImage::ImageLuma8(img.clone()),
        }
    }
}

impl From<DynamicImage> for Bitmap {
    /// Sources without colour stay single-channel, everything else is RGB8.
    /// Alpha is dropped, not composited.
    fn from(image: DynamicImage) -> Bitmap {
        if image.color().has_color() {
            Bitmap::Rgb(image.into_rgb8())
        } else {
            Bitmap::Gray(image.into_luma8())
        }
    }
}

/// Where a pipeline run currently is
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Decoded(Bitmap),
    GeometricallyNormalized(Bitmap),
    TonallyNormalized(Bitmap),
    Tensorized(NormalizedTensor),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Decoded(_) => "decoded",
            Stage::GeometricallyNormalized(_) => "geometrically normalized",
            Stage::TonallyNormalized(_) => "tonally normalized",
            Stage::Tensorized(_) => "tensorized",
        }
    }
}

/// Turns raw payloads into model input of a fixed spatial size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preprocessor {
    target_size: u32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Preprocessor::new(TARGET_SIZE)
    }
}

impl Preprocessor {
    /// # Panics
    ///
    /// If `target_size` is zero
    pub fn new(target_size: u32) -> Self {
        assert!(target_size > 0, "target size must be positive");
        Preprocessor { target_size }
    }

    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Decode a raw payload, entering the state machine
    pub fn start(&self, raw: &str) -> Result<Stage> {
        let bitmap = decode(raw)?;
        debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            channels = bitmap.channels(),
            "decoded image"
        );
        Ok(Stage::Decoded(bitmap))
    }

    /// Perform exactly one transition. `Tensorized` is terminal and is
    /// returned as is
    pub fn advance(&self, stage: Stage) -> Result<Stage> {
        let next = match stage {
            Stage::Decoded(bitmap) => {
                Stage::GeometricallyNormalized(resize_and_filter(&bitmap, self.target_size)?)
            }
            Stage::GeometricallyNormalized(bitmap) => {
                Stage::TonallyNormalized(normalize_tone(&bitmap))
            }
            Stage::TonallyNormalized(bitmap) => {
                Stage::Tensorized(to_tensor(&bitmap, self.target_size)?)
            }
            done @ Stage::Tensorized(_) => return Ok(done),
        };
        debug!(stage = next.name(), "pipeline advanced");
        Ok(next)
    }

    /// Run the whole pipeline on a raw base64 payload
    pub fn run(&self, raw: &str) -> Result<NormalizedTensor> {
        let mut stage = self.start(raw)?;
        loop {
            stage = match stage {
                Stage::Tensorized(tensor) => return Ok(tensor),
                other => self.advance(other)?,
            };
        }
    }
}

/// Preprocess with the default target size
pub fn preprocess(raw: &str) -> Result<NormalizedTensor> {
    Preprocessor::default().run(raw)
}
