use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inspect::ImageDetails;
use crate::model::{CLASS_LABELS, NUM_CLASSES};

/// One class label with its predicted probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub label: String,
    pub probability: f32,
}

/// Qualitative label for how close the scan is to square. Thresholds are on
/// max(w,h)/min(w,h): <= 1.5 optimal, <= 2.0 acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectStatus {
    Optimal,
    Acceptable,
    #[serde(rename = "Not optimal")]
    NotOptimal,
}

impl AspectStatus {
    pub fn classify(ratio: f64) -> Self {
        if ratio <= 1.5 {
            AspectStatus::Optimal
        } else if ratio <= 2.0 {
            AspectStatus::Acceptable
        } else {
            AspectStatus::NotOptimal
        }
    }
}

impl fmt::Display for AspectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AspectStatus::Optimal => "Optimal",
            AspectStatus::Acceptable => "Acceptable",
            AspectStatus::NotOptimal => "Not optimal",
        };
        f.write_str(s)
    }
}

pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    let (w, h) = (f64::from(width), f64::from(height));
    w.max(h) / w.min(h)
}

/// The aggregated per-prediction record: what `/predict` returns, what the
/// session holds, and what `/result` renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub predictions: Vec<ClassScore>,
    pub image_path: String,
    pub predicted_class: String,
    pub confidence: f32,
    pub original_width: u32,
    pub original_height: u32,
    pub aspect_ratio: f64,
    pub aspect_ratio_status: AspectStatus,
    pub file_size: String,
    pub file_format: String,
    pub color_mode: String,
}

/// Pure assembly step: sorts the scores, picks the top class, derives the
/// aspect ratio and builds the public image URL from the stored filename.
pub fn aggregate(
    scores: [f32; NUM_CLASSES],
    details: ImageDetails,
    stored_name: &str,
) -> ResultRecord {
    let mut predictions: Vec<ClassScore> = CLASS_LABELS
        .iter()
        .zip(scores)
        .map(|(label, probability)| ClassScore {
            label: (*label).to_string(),
            probability,
        })
        .collect();
    // Stable sort keeps class order among ties, matching an argmax that
    // returns the first maximum.
    predictions.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });

    let top = predictions[0].clone();
    let ratio = aspect_ratio(details.width, details.height);

    ResultRecord {
        predictions,
        image_path: format!("/static/uploads/{stored_name}"),
        predicted_class: top.label,
        confidence: top.probability,
        original_width: details.width,
        original_height: details.height,
        aspect_ratio: ratio,
        aspect_ratio_status: AspectStatus::classify(ratio),
        file_size: details.size,
        file_format: details.format,
        color_mode: details.mode,
    }
}
