use std::sync::Arc;

use base64::Engine;
use image::GenericImageView;

use crate::error::StorageError;

/// Decoded RGB8 pixels ready to be placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl EmbeddedImage {
    /// Largest size fitting in `max_w` x `max_h` that keeps the aspect ratio.
    pub fn fit_within(&self, max_w: f32, max_h: f32) -> (f32, f32) {
        if self.width == 0 || self.height == 0 {
            return (0.0, 0.0);
        }
        let aspect = self.width as f32 / self.height as f32;
        if max_w / max_h > aspect {
            (max_h * aspect, max_h)
        } else {
            (max_w, max_w / aspect)
        }
    }
}

/// Decodes PNG or JPEG bytes. Transparent pixels are flattened onto white so
/// pictograms keep their background once the alpha channel is dropped.
pub fn decode_image(bytes: &[u8]) -> Result<EmbeddedImage, StorageError> {
    if bytes.is_empty() {
        return Err(StorageError::Decode("empty image body".into()));
    }
    let img = image::load_from_memory(bytes).map_err(|e| StorageError::Decode(e.to_string()))?;
    let (width, height) = img.dimensions();
    let rgba = img.to_rgba8();
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let alpha = a as u16;
        for channel in [r, g, b] {
            let blended = (channel as u16 * alpha + 255 * (255 - alpha)) / 255;
            pixels.push(blended as u8);
        }
    }
    Ok(EmbeddedImage { width, height, pixels: pixels.into() })
}

/// `data:application/pdf;base64,...` for a finished document.
pub fn encode_data_url(pdf: &[u8]) -> String {
    format!(
        "data:application/pdf;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(pdf)
    )
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 0, 0, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_to_rgb() {
        let img = decode_image(&png_fixture(3, 2)).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.pixels.len(), 18);
        assert_eq!(&img.pixels[..3], &[200, 0, 0]);
    }

    #[test]
    fn transparent_pixels_become_white() {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 0]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img).write_to(&mut buf, image::ImageFormat::Png).unwrap();
        let decoded = decode_image(buf.get_ref()).unwrap();
        assert_eq!(&decoded.pixels[..], &[255, 255, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(decode_image(b"<html>denied</html>"), Err(StorageError::Decode(_))));
        assert!(matches!(decode_image(&[]), Err(StorageError::Decode(_))));
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        let img = EmbeddedImage { width: 200, height: 100, pixels: Arc::from(vec![0u8; 0]) };
        assert_eq!(img.fit_within(40.0, 40.0), (40.0, 20.0));
        assert_eq!(img.fit_within(40.0, 10.0), (20.0, 10.0));
    }

    #[test]
    fn data_url_has_pdf_prefix() {
        assert_eq!(encode_data_url(b"%PDF"), "data:application/pdf;base64,JVBERg==");
    }
}
