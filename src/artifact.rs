use std::io;
use std::path::Path;

/// Downloads the model artifact when it is not already on disk. Part of
/// startup; any failure here aborts the service before it binds.
pub async fn ensure_model(path: &Path, url: &str) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }

    log::info!("Model artifact missing, downloading from {url}");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(io::Error::other)?;
    let bytes = response.bytes().await.map_err(io::Error::other)?;
    std::fs::write(path, &bytes)?;

    log::info!(
        "Saved model artifact to {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(())
}
