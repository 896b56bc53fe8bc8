//! Tonal normalization. Inversion comes first, grayscale second: the model
//! was trained on light strokes over a dark background, while user drawings
//! are dark ink on white.

use super::Bitmap;
use image::{imageops, GrayImage, Luma, Rgb};

/// Invert, then collapse to a single luminance channel
pub fn normalize_tone(bitmap: &Bitmap) -> Bitmap {
    grayscale(&invert(bitmap))
}

/// `255 - v` on every channel
pub fn invert(bitmap: &Bitmap) -> Bitmap {
    match bitmap {
        Bitmap::Rgb(img) => {
            let mut out = img.clone();
            imageops::invert(&mut out);
            Bitmap::Rgb(out)
        }
        Bitmap::Gray(img) => {
            let mut out = img.clone();
            imageops::invert(&mut out);
            Bitmap::Gray(out)
        }
    }
}

/// Collapse RGB to luminance with ITU-R BT.601 weights. Grayscale input is
/// returned unchanged
pub fn grayscale(bitmap: &Bitmap) -> Bitmap {
    match bitmap {
        Bitmap::Rgb(img) => {
            let (width, height) = img.dimensions();
            Bitmap::Gray(GrayImage::from_fn(width, height, |x, y| {
                Luma([luminance(img.get_pixel(x, y))])
            }))
        }
        Bitmap::Gray(img) => Bitmap::Gray(img.clone()),
    }
}

/// Rounded `0.299 R + 0.587 G + 0.114 B` in integer arithmetic
fn luminance(&Rgb([r, g, b]): &Rgb<u8>) -> u8 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((weighted + 500) / 1000) as u8
}
