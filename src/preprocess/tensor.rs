//! Bitmap -> model input tensor of shape (batch, height, width, channel)

use super::Bitmap;
use crate::config::MAX_INTENSITY;
use crate::error::{PipelineError, Result};
use image::GrayImage;
use ndarray::{Array2, Array4, ArrayView4, Axis};
use serde::ser::{Serialize, Serializer};

/// A (1, H, W, 1) tensor with every element in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor(Array4<f32>);

impl NormalizedTensor {
    pub fn shape(&self) -> [usize; 4] {
        let (b, h, w, c) = self.0.dim();
        [b, h, w, c]
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.0.view()
    }

    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().copied()
    }

    /// Smallest and largest element, `None` for an empty tensor
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.values().fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Nested `[batch][row][column][channel]` lists, the layout the
    /// inference endpoint expects for its `instances`
    pub fn to_instances(&self) -> Vec<Vec<Vec<Vec<f32>>>> {
        self.0
            .outer_iter()
            .map(|image| {
                image
                    .outer_iter()
                    .map(|row| row.outer_iter().map(|pixel| pixel.to_vec()).collect())
                    .collect()
            })
            .collect()
    }
}

impl Serialize for NormalizedTensor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_instances().serialize(serializer)
    }
}

/// Convert a `target x target` grayscale bitmap into a scaled tensor
pub fn to_tensor(bitmap: &Bitmap, target: u32) -> Result<NormalizedTensor> {
    let gray = match bitmap {
        Bitmap::Gray(img) if img.dimensions() == (target, target) => img,
        _ => {
            let (width, height) = bitmap.dimensions();
            return Err(PipelineError::ShapeMismatch {
                expected_width: target,
                expected_height: target,
                width,
                height,
                channels: bitmap.channels(),
            });
        }
    };

    let array = to_array(gray)?;
    Ok(NormalizedTensor(scale(expand_dims(array))))
}

/// (height, width) array of raw intensities
fn to_array(img: &GrayImage) -> Result<Array2<u8>> {
    let (width, height) = img.dimensions();
    Array2::from_shape_vec((height as usize, width as usize), img.as_raw().clone()).map_err(
        |_| PipelineError::ShapeMismatch {
            expected_width: width,
            expected_height: height,
            width,
            height,
            channels: 1,
        },
    )
}

/// (height, width) -> (1, height, width, 1)
fn expand_dims(array: Array2<u8>) -> Array4<u8> {
    array.insert_axis(Axis(0)).insert_axis(Axis(3))
}

fn scale(array: Array4<u8>) -> Array4<f32> {
    array.mapv(|v| f32::from(v) / MAX_INTENSITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, RgbImage};

    #[test]
    fn builds_batch_and_channel_dims() {
        let img = GrayImage::from_fn(28, 28, |x, y| Luma([(x + y) as u8]));
        let tensor = to_tensor(&Bitmap::Gray(img), 28).unwrap();
        assert_eq!(tensor.shape(), [1, 28, 28, 1]);
        // Row-major: [batch][y][x][channel]
        assert_eq!(tensor.view()[[0, 3, 5, 0]], 8.0 / 255.0);
    }

    #[test]
    fn scales_with_float_division() {
        let img = GrayImage::from_fn(2, 2, |x, y| Luma([[0, 1, 128, 255][(y * 2 + x) as usize]]));
        let tensor = to_tensor(&Bitmap::Gray(img), 2).unwrap();
        let values: Vec<f32> = tensor.values().collect();
        assert_eq!(values, vec![0.0, 1.0 / 255.0, 128.0 / 255.0, 1.0]);
        assert_eq!(tensor.value_range(), Some((0.0, 1.0)));
    }

    #[test]
    fn wrong_size_is_a_shape_mismatch() {
        let err = to_tensor(&Bitmap::Gray(GrayImage::new(27, 28)), 28).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ShapeMismatch { width: 27, height: 28, channels: 1, .. }
        ));
    }

    #[test]
    fn colour_input_is_a_shape_mismatch() {
        let err = to_tensor(&Bitmap::Rgb(RgbImage::new(28, 28)), 28).unwrap_err();
        assert!(matches!(err, PipelineError::ShapeMismatch { channels: 3, .. }));
    }

    #[test]
    fn serializes_as_nested_instances() {
        let tensor = to_tensor(&Bitmap::Gray(GrayImage::from_pixel(3, 3, Luma([255]))), 3).unwrap();
        let json = serde_json::to_value(&tensor).unwrap();
        assert_eq!(json, serde_json::json!([[[[1.0], [1.0], [1.0]], [[1.0], [1.0], [1.0]], [[1.0], [1.0], [1.0]]]]));
        assert_eq!(tensor.to_instances()[0].len(), 3);
    }
}
