//! Upload → model input tensor.
//!
//! The model was trained on 224×224 RGB images scaled to `[0, 1]` in
//! channels-last layout, so every upload is pushed through the same steps:
//! decode, JPEG round trip (flattens alpha/palette/16-bit sources to 8-bit
//! RGB), nearest-neighbour resize, scale.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::DetectError;

/// Square side length the model expects.
pub const INPUT_SIZE: u32 = 224;
/// RGB.
pub const CHANNELS: usize = 3;

/// Flat `f32` input tensor with its `[batch, height, width, channel]` shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub data: Vec<f32>,
    pub shape: [usize; 4],
}

impl ImageTensor {
    /// Shape as `i64`, the form ONNX Runtime takes.
    pub fn shape_i64(&self) -> [i64; 4] {
        self.shape.map(|d| d as i64)
    }
}

/// Decode raw upload bytes and build the model input tensor.
pub fn preprocess(bytes: &[u8]) -> Result<ImageTensor, DetectError> {
    if bytes.is_empty() {
        return Err(DetectError::EmptyUpload);
    }

    let decoded = image::load_from_memory(bytes)?;
    debug!(
        width = decoded.width(),
        height = decoded.height(),
        "decoded upload"
    );

    let normalized = jpeg_round_trip(&decoded)?;
    Ok(to_tensor(&normalized))
}

/// Re-encode as JPEG and decode again.
fn jpeg_round_trip(img: &DynamicImage) -> Result<DynamicImage, DetectError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)?;
    Ok(image::load_from_memory_with_format(&buf, ImageFormat::Jpeg)?)
}

fn to_tensor(img: &DynamicImage) -> ImageTensor {
    let resized = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Nearest)
        .to_rgb8();

    let side = INPUT_SIZE as usize;
    let mut data = Vec::with_capacity(side * side * CHANNELS);
    // Row-major pixels, channels interleaved: exactly HWC.
    for pixel in resized.pixels() {
        data.extend(pixel.0.iter().map(|&c| f32::from(c) / 255.0));
    }

    ImageTensor {
        data,
        shape: [1, side, side, CHANNELS],
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

    const LEN: usize = 224 * 224 * 3;

    /// Encode an image to bytes in the given container format.
    pub(crate) fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    /// 16×16 checkerboard of black and white 4×4 tiles, PNG-encoded.
    pub(crate) fn checkerboard_png() -> Vec<u8> {
        let img: RgbImage = ImageBuffer::from_fn(16, 16, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
    }

    #[test]
    fn tensor_has_model_shape() {
        let tensor = preprocess(&checkerboard_png()).unwrap();
        assert_eq!(tensor.shape, [1, 224, 224, 3]);
        assert_eq!(tensor.shape_i64(), [1, 224, 224, 3]);
        assert_eq!(tensor.data.len(), LEN);
    }

    #[test]
    fn values_are_unit_scaled() {
        let tensor = preprocess(&checkerboard_png()).unwrap();
        assert!(tensor.data.iter().all(|v| (0.0..=1.0).contains(v)));

        // JPEG is lossy, but a hard black/white pattern keeps its extremes.
        let max = tensor.data.iter().cloned().fold(f32::MIN, f32::max);
        let min = tensor.data.iter().cloned().fold(f32::MAX, f32::min);
        assert!(max > 0.9, "max {max}");
        assert!(min < 0.1, "min {min}");
    }

    #[test]
    fn solid_colour_maps_to_channel_values() {
        let img: RgbImage = ImageBuffer::from_pixel(50, 30, Rgb([255, 0, 0]));
        let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Png);
        let tensor = preprocess(&bytes).unwrap();

        // Centre pixel, away from JPEG block edges.
        let idx = (112 * 224 + 112) * 3;
        let (r, g, b) = (tensor.data[idx], tensor.data[idx + 1], tensor.data[idx + 2]);
        assert!(r > 0.9, "red channel {r}");
        assert!(g < 0.1, "green channel {g}");
        assert!(b < 0.1, "blue channel {b}");
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let img: RgbaImage = ImageBuffer::from_pixel(8, 8, Rgba([0, 0, 255, 128]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
        let tensor = preprocess(&bytes).unwrap();
        assert_eq!(tensor.data.len(), LEN);
    }

    #[test]
    fn grayscale_expands_to_rgb() {
        let img = image::GrayImage::from_pixel(10, 10, image::Luma([128]));
        let bytes = encode(DynamicImage::ImageLuma8(img), ImageFormat::Png);
        let tensor = preprocess(&bytes).unwrap();
        assert_eq!(tensor.data.len(), LEN);
        let (r, g, b) = (tensor.data[0], tensor.data[1], tensor.data[2]);
        assert!((r - g).abs() < 0.02 && (g - b).abs() < 0.02);
    }

    #[test]
    fn jpeg_input_accepted() {
        let img: RgbImage = ImageBuffer::from_pixel(300, 400, Rgb([10, 200, 30]));
        let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg);
        assert_eq!(preprocess(&bytes).unwrap().data.len(), LEN);
    }

    #[test]
    fn garbage_is_invalid_image() {
        let err = preprocess(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DetectError::InvalidImage(_)), "{err:?}");
    }

    #[test]
    fn truncated_png_is_invalid_image() {
        let bytes = checkerboard_png();
        let err = preprocess(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, DetectError::InvalidImage(_)), "{err:?}");
    }

    #[test]
    fn empty_upload() {
        assert!(matches!(preprocess(&[]), Err(DetectError::EmptyUpload)));
    }
}
