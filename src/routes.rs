use std::path::{Path, PathBuf};

use actix_files::Files;
use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, web};
use futures_util::{StreamExt, TryStreamExt};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::PredictError;
use crate::inspect;
use crate::model::Classifier;
use crate::preprocess;
use crate::result::{self, ResultRecord};
use crate::session::ResultStore;
use crate::validation::allowed_file;

pub fn configure_routes(cfg: &mut web::ServiceConfig, uploads_dir: PathBuf) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/upload").route(web::get().to(upload_page)))
        .service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/result").route(web::get().to(result_page)))
        .service(Files::new("/static/uploads", uploads_dir));
}

async fn index() -> HttpResponse {
    html_page(include_str!("../templates/index.html"))
}

async fn upload_page() -> HttpResponse {
    html_page(include_str!("../templates/upload.html"))
}

/// Full prediction flow: validate the upload, save it under a unique name,
/// preprocess, run the classifier, inspect the file and store the aggregated
/// record in the session before returning it as JSON.
async fn predict(
    payload: Multipart,
    session: Session,
    classifier: web::Data<dyn Classifier>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, PredictError> {
    let (filename, data) = read_upload(payload).await?;
    if filename.is_empty() {
        return Err(PredictError::EmptyFilename);
    }
    if !allowed_file(&filename) {
        return Err(PredictError::InvalidFileType);
    }

    std::fs::create_dir_all(&config.uploads_dir)?;
    // Uploads are stored under a UUID-prefixed name so concurrent requests
    // with the same client filename never clobber each other.
    let stored_name = format!("{}-{}", Uuid::new_v4(), basename(&filename));
    let filepath = config.uploads_dir.join(&stored_name);
    std::fs::write(&filepath, &data)?;

    let tensor = preprocess::preprocess_image(&filepath)?;
    let scores = classifier.predict(&tensor)?;
    let details = inspect::image_details(&filepath)?;
    let record = result::aggregate(scores, details, &stored_name);

    ResultStore::set(&session, &record)?;
    log::info!(
        "Predicted {} ({:.3}) for {}",
        record.predicted_class,
        record.confidence,
        stored_name
    );

    Ok(HttpResponse::Ok().json(record))
}

async fn result_page(session: Session) -> HttpResponse {
    match ResultStore::get(&session) {
        Some(record) => html_page(&render_result(&record)),
        None => HttpResponse::Found()
            .insert_header((header::LOCATION, "/upload"))
            .finish(),
    }
}

/// Pulls the `file` field out of the multipart payload. A payload without
/// that field means no file was uploaded at all.
async fn read_upload(mut payload: Multipart) -> Result<(String, Vec<u8>), PredictError> {
    while let Ok(Some(mut field)) = payload.try_next().await {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("")
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| PredictError::Upload(e.to_string()))?;
            data.extend_from_slice(&chunk);
        }
        return Ok((filename, data));
    }

    Err(PredictError::MissingFile)
}

/// Client filenames may carry path components; only the final segment is
/// used on disk.
fn basename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

fn html_page(body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body.to_string())
}

fn render_result(record: &ResultRecord) -> String {
    let rows: String = record
        .predictions
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>{:.1}%</td></tr>\n",
                p.label,
                p.probability * 100.0
            )
        })
        .collect();

    include_str!("../templates/result.html")
        .replace("{{predicted_class}}", &record.predicted_class)
        .replace(
            "{{confidence}}",
            &format!("{:.1}", record.confidence * 100.0),
        )
        .replace("{{prediction_rows}}", &rows)
        .replace("{{image_path}}", &record.image_path)
        .replace("{{width}}", &record.original_width.to_string())
        .replace("{{height}}", &record.original_height.to_string())
        .replace("{{aspect_ratio}}", &format!("{:.2}", record.aspect_ratio))
        .replace(
            "{{aspect_ratio_status}}",
            &record.aspect_ratio_status.to_string(),
        )
        .replace("{{file_size}}", &record.file_size)
        .replace("{{file_format}}", &record.file_format)
        .replace("{{color_mode}}", &record.color_mode)
}
