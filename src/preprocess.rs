use std::path::Path;

use image::imageops::FilterType;
use ndarray::Array4;

use crate::error::PredictError;

/// Input edge length the classifier was trained on.
pub const INPUT_SIZE: u32 = 224;

/// Loads an image from disk and turns it into the classifier's input tensor:
/// forced to RGB, resized to exactly 224x224 (no aspect preservation), laid
/// out NHWC as (1, 224, 224, 3). Pixel values stay in their raw 0-255 range;
/// the model normalizes internally.
pub fn preprocess_image(path: &Path) -> Result<Array4<f32>, PredictError> {
    let img = image::open(path)?;
    let rgb = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();

    let size = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, y as usize, x as usize, c]] = f32::from(pixel[c]);
        }
    }

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn output_shape_is_fixed_for_any_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(300, 120, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let tensor = preprocess_image(&path).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn grayscale_input_is_expanded_to_three_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(64, 64, Luma([200]))
            .save(&path)
            .unwrap();

        let tensor = preprocess_image(&path).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        for &v in tensor.iter() {
            assert!((0.0..=255.0).contains(&v));
        }
        // A uniform gray image stays uniform across all three channels.
        assert_eq!(tensor[[0, 0, 0, 0]], tensor[[0, 0, 0, 1]]);
        assert_eq!(tensor[[0, 0, 0, 1]], tensor[[0, 0, 0, 2]]);
    }

    #[test]
    fn pixel_values_are_not_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.png");
        RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();

        let tensor = preprocess_image(&path).unwrap();
        assert_eq!(tensor[[0, 112, 112, 0]], 255.0);
    }

    #[test]
    fn undecodable_file_is_an_image_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = preprocess_image(&path).unwrap_err();
        assert!(matches!(err, PredictError::ImageLoad(_)));
    }
}
