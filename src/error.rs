use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// One variant per stage that can fail while handling a prediction, so the
/// HTTP layer can tell a bad upload apart from a bad image or a model fault.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("Malformed upload: {0}")]
    Upload(String),

    #[error("Failed to decode image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Cannot access file: {0}")]
    FileAccess(#[from] std::io::Error),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Session error: {0}")]
    Session(String),
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::MissingFile
            | PredictError::EmptyFilename
            | PredictError::InvalidFileType
            | PredictError::Upload(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Prediction failed: {self}");
        } else {
            log::warn!("Rejected request: {self}");
        }
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_stage_errors_are_bad_requests() {
        assert_eq!(PredictError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(PredictError::EmptyFilename.status(), StatusCode::BAD_REQUEST);
        assert_eq!(PredictError::InvalidFileType.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn processing_errors_are_server_errors() {
        let err = PredictError::Inference("bad tensor".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_match_the_api_contract() {
        assert_eq!(PredictError::MissingFile.to_string(), "No file uploaded");
        assert_eq!(PredictError::EmptyFilename.to_string(), "No file selected");
        assert_eq!(PredictError::InvalidFileType.to_string(), "Invalid file type");
    }
}
