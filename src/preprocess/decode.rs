//! Base64 payload -> `Bitmap`

use super::Bitmap;
use crate::error::{PipelineError, Result};
use crate::util::strip_data_url;
use base64::{engine::general_purpose, Engine as _};

/// Decode a base64 (optionally data-URL wrapped) image into a bitmap.
/// Whitespace inside the payload is ignored, as line-wrapped encoders
/// produce it.
pub fn decode(raw: &str) -> Result<Bitmap> {
    let payload: String = strip_data_url(raw)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(PipelineError::Decode("empty image payload".into()));
    }

    let bytes = general_purpose::STANDARD.decode(payload)?;
    let image = image::load_from_memory(&bytes)?;
    Ok(image.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test;
    use base64::Engine as _;

    #[test]
    fn decodes_rgb_png() {
        let bitmap = decode(&test::solid_rgb(7, 3, [1, 2, 3])).unwrap();
        assert_eq!(bitmap.dimensions(), (7, 3));
        assert_eq!(bitmap.channels(), 3);
    }

    #[test]
    fn grayscale_stays_single_channel() {
        let bitmap = decode(&test::solid_gray(4, 4, 9)).unwrap();
        assert_eq!(bitmap.channels(), 1);
    }

    #[test]
    fn accepts_canvas_data_urls() {
        let raw = format!("data:image/png;base64,{}", test::solid_rgb(2, 2, [0, 0, 0]));
        assert_eq!(decode(&raw).unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn ignores_line_wrapping() {
        let raw = test::solid_rgb(9, 9, [5, 5, 5]);
        let (head, tail) = raw.split_at(raw.len() / 2);
        let wrapped = format!("{head}\r\n{tail}\n");
        assert_eq!(decode(&wrapped).unwrap().dimensions(), (9, 9));
    }

    #[test]
    fn rejects_malformed_base64() {
        assert!(matches!(decode("@@@@"), Err(PipelineError::Decode(_))));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let raw = general_purpose::STANDARD.encode(b"definitely not a png");
        assert!(matches!(decode(&raw), Err(PipelineError::Decode(_))));
    }

    #[test]
    fn rejects_empty_payloads() {
        assert!(matches!(decode(""), Err(PipelineError::Decode(_))));
        assert!(matches!(
            decode("data:image/png;base64,"),
            Err(PipelineError::Decode(_))
        ));
    }
}
