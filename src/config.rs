use std::env;
use std::path::PathBuf;

const DEFAULT_MODEL_URL: &str =
    "https://github.com/mlprasoon/BrainCheck/releases/download/model/best_model.onnx";

/// Environment-driven service configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub uploads_dir: PathBuf,
    pub model_path: PathBuf,
    pub model_url: String,
    pub session_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let uploads_dir = env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static/uploads"));
        let model_path = env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("models/braincheck.onnx"));
        let model_url = env::var("MODEL_URL").unwrap_or_else(|_| DEFAULT_MODEL_URL.to_string());
        let session_secret = env::var("SESSION_SECRET").ok();

        Self {
            port,
            uploads_dir,
            model_path,
            model_url,
            session_secret,
        }
    }
}
