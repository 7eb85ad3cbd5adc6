//! Bitmap → model input tensor.
//!
//! The network expects a 224x224 RGB image, intensities scaled to `[0, 1]`,
//! laid out planar: every R value, then every G, then every B, each plane in
//! row-major order. No mean/std normalization and no letterboxing: the image
//! is stretched to the input size.

use image::{imageops::FilterType, DynamicImage};

use super::types::InputTensor;
use crate::error::{CaneScanError, Result};

/// Spatial input size of the bundled model.
pub const MODEL_INPUT_SIZE: u32 = 224;

/// Colour channels fed to the model.
pub const CHANNELS: usize = 3;

/// Preprocess for the bundled model's 224x224 input.
pub fn preprocess(image: &DynamicImage) -> Result<InputTensor> {
    preprocess_with_size(image, MODEL_INPUT_SIZE, MODEL_INPUT_SIZE)
}

pub fn preprocess_with_size(image: &DynamicImage, width: u32, height: u32) -> Result<InputTensor> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CaneScanError::InvalidImage(format!(
            "cannot preprocess a {}x{} image",
            image.width(),
            image.height()
        )));
    }
    if width == 0 || height == 0 {
        return Err(CaneScanError::InvalidImage(format!(
            "invalid target size {}x{}",
            width, height
        )));
    }

    let resized = if image.width() == width && image.height() == height {
        image.to_rgb8()
    } else {
        image
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgb8()
    };

    let plane = (width * height) as usize;
    let mut data = vec![0.0f32; CHANNELS * plane];

    for (i, pixel) in resized.pixels().enumerate() {
        data[i] = pixel[0] as f32 / 255.0;
        data[plane + i] = pixel[1] as f32 / 255.0;
        data[2 * plane + i] = pixel[2] as f32 / 255.0;
    }

    InputTensor::from_planar(CHANNELS, height as usize, width as usize, data)
        .ok_or_else(|| CaneScanError::InvalidImage("tensor size mismatch".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_output_shape_is_fixed() {
        let img = DynamicImage::new_rgb8(640, 480);
        let tensor = preprocess(&img).unwrap();
        assert_eq!(tensor.shape(), [3, 224, 224]);
        assert_eq!(tensor.data().len(), 3 * 224 * 224);
    }

    #[test]
    fn test_black_image_is_all_zero() {
        let tensor = preprocess(&DynamicImage::new_rgb8(224, 224)).unwrap();
        assert!(tensor.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_planar_layout_and_scaling() {
        // 2x1 image: left pixel pure red, right pixel (0, 51, 255)
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 51, 255]));
        let tensor = preprocess_with_size(&DynamicImage::ImageRgb8(img), 2, 1).unwrap();

        assert_eq!(tensor.channel(0), &[1.0, 0.0]);
        assert_eq!(tensor.channel(1), &[0.0, 0.2]);
        assert_eq!(tensor.channel(2), &[0.0, 1.0]);
    }

    #[test]
    fn test_row_major_order_within_plane() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 0]));
        img.put_pixel(1, 1, Rgb([0, 0, 0]));
        let tensor = preprocess_with_size(&DynamicImage::ImageRgb8(img), 2, 2).unwrap();
        assert_eq!(tensor.channel(0), &[0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_alpha_is_discarded() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 0]));
        let tensor = preprocess_with_size(&DynamicImage::ImageRgba8(img), 4, 4).unwrap();
        assert_eq!(tensor.data().len(), 3 * 16);
        assert!(tensor.data().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_values_stay_in_unit_range() {
        let img = RgbImage::from_fn(300, 200, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        let tensor = preprocess(&DynamicImage::ImageRgb8(img)).unwrap();
        assert!(tensor.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_deterministic() {
        let img = RgbImage::from_fn(97, 53, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
        let img = DynamicImage::ImageRgb8(img);
        assert_eq!(preprocess(&img).unwrap(), preprocess(&img).unwrap());
    }

    #[test]
    fn test_zero_dimension_is_invalid() {
        let img = DynamicImage::new_rgb8(0, 10);
        assert!(matches!(preprocess(&img), Err(CaneScanError::InvalidImage(_))));
    }
}
