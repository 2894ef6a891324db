use std::fs;
use std::path::Path;

use image::{ColorType, DynamicImage, ImageReader};
use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Descriptive metadata for an uploaded image, shown alongside the
/// prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDetails {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub mode: String,
    pub size: String,
}

pub fn image_details(path: &Path) -> Result<ImageDetails, PredictError> {
    let bytes = fs::metadata(path)?.len();

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .map(|f| format!("{f:?}").to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let img = reader.decode()?;

    Ok(ImageDetails {
        width: img.width(),
        height: img.height(),
        format,
        mode: color_mode(&img).to_string(),
        size: format_size(bytes),
    })
}

fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// PIL-style color mode code for display.
fn color_mode(img: &DynamicImage) -> &'static str {
    match img.color() {
        ColorType::L8 | ColorType::L16 => "L",
        ColorType::La8 | ColorType::La16 => "LA",
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB",
        _ => "RGBA",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn reports_dimensions_format_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        RgbImage::from_pixel(80, 40, Rgb([1, 2, 3])).save(&path).unwrap();

        let details = image_details(&path).unwrap();
        assert_eq!(details.width, 80);
        assert_eq!(details.height, 40);
        assert_eq!(details.format, "PNG");
        assert_eq!(details.mode, "RGB");
    }

    #[test]
    fn grayscale_mode_is_l() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(16, 16, Luma([9])).save(&path).unwrap();

        let details = image_details(&path).unwrap();
        assert_eq!(details.mode, "L");
    }

    #[test]
    fn size_is_kilobytes_with_one_decimal() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(100), "0.1 KB");
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let err = image_details(Path::new("/nonexistent/scan.png")).unwrap_err();
        assert!(matches!(err, PredictError::FileAccess(_)));
    }
}
