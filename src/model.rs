use std::path::Path;

use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::PredictError;
use crate::preprocess::INPUT_SIZE;

/// Fixed class order of the classifier's output layer.
pub const CLASS_LABELS: [&str; 4] = ["Glioma", "Meningioma", "No Tumor", "Pituitary"];

pub const NUM_CLASSES: usize = 4;

/// Seam between the HTTP handlers and the loaded model, so tests can swap in
/// a stub without a model artifact on disk.
pub trait Classifier: Send + Sync {
    /// Forward pass over one preprocessed (1, 224, 224, 3) tensor, returning
    /// softmax scores in [`CLASS_LABELS`] order.
    fn predict(&self, input: &Array4<f32>) -> Result<[f32; NUM_CLASSES], PredictError>;
}

/// ONNX-backed classifier. The plan is built once at startup and is read-only
/// afterwards, so it is shared across requests without locking.
pub struct OnnxClassifier {
    plan: TypedSimplePlan<TypedModel>,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        log::info!("Loading classifier from {}", path.display());
        let size = INPUT_SIZE as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| {
                m.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, size, size, 3)),
                )
            })
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| PredictError::Inference(format!("model load failed: {e}")))?;
        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: &Array4<f32>) -> Result<[f32; NUM_CLASSES], PredictError> {
        let size = INPUT_SIZE as usize;
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = tract_ndarray::Array4::from_shape_vec((1, size, size, 3), data)
            .map_err(|e| PredictError::Inference(e.to_string()))?
            .into_tensor();

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let scores: Vec<f32> = view.iter().copied().collect();
        if scores.len() != NUM_CLASSES {
            return Err(PredictError::Inference(format!(
                "expected {NUM_CLASSES} class scores, got {}",
                scores.len()
            )));
        }

        let mut out = [0.0f32; NUM_CLASSES];
        out.copy_from_slice(&scores);
        Ok(out)
    }
}
