//! Request handlers

use crate::storage::{download_name, secure_filename, DownloadError, TempStore};
use crate::templates::{render, DownloadPage, IndexPage, Notice};
use crate::validate::{validate_excel_file, ValidationError};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sheetfix_convert::{process_file, ConversionReport, ConvertError, ConvertOptions};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

const ALLOWED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    notice: Option<String>,
}

pub async fn index(Query(query): Query<IndexQuery>) -> Response {
    let notice = query
        .notice
        .as_deref()
        .and_then(Notice::from_code)
        .map(Notice::message);
    render(&IndexPage { notice })
}

pub async fn upload_form() -> Redirect {
    Redirect::to("/")
}

fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

#[derive(Debug, Error)]
enum UploadError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("conversion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match &self {
            UploadError::Invalid(err) => {
                warn!(error = %err, "invalid excel file rejected");
                Notice::InvalidExcel.redirect().into_response()
            }
            _ => {
                error!(error = %self, "file processing error");
                Notice::ProcessingFailed.redirect().into_response()
            }
        }
    }
}

fn multipart_failure(err: MultipartError) -> Response {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(error = %err, "upload rejected: request too large");
        (status, "Archivo demasiado grande").into_response()
    } else {
        info!(error = %err, "malformed upload");
        Notice::NoFile.redirect().into_response()
    }
}

/// Remove a file that may already be gone.
async fn discard(path: &std::path::Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!(path = %path.display(), "removed uploaded file"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => error!(path = %path.display(), error = %err, "error during cleanup"),
    }
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(mut multipart) = multipart else {
        info!("upload without a multipart body");
        return Notice::NoFile.redirect().into_response();
    };

    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => {}
            Ok(None) => {
                info!("upload without a file field");
                return Notice::NoFile.redirect().into_response();
            }
            Err(err) => return multipart_failure(err),
        }
    };

    let filename = field.file_name().unwrap_or_default().to_string();
    if filename.is_empty() {
        info!("upload with an empty file name");
        return Notice::NoFile.redirect().into_response();
    }
    if !allowed_file(&filename) {
        info!(%filename, "rejected upload: invalid file type");
        return Notice::InvalidType.redirect().into_response();
    }

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => return multipart_failure(err),
    };

    let mut original_name = secure_filename(&filename);
    if !allowed_file(&original_name) {
        let ext = filename.rsplit_once('.').map_or("xlsx", |(_, ext)| ext);
        original_name = format!("archivo.{}", ext.to_ascii_lowercase());
    }

    match store_and_convert(&state, &original_name, bytes).await {
        Ok((processed_name, report)) => {
            render(&DownloadPage::new(processed_name, original_name, &report))
        }
        Err(err) => err.into_response(),
    }
}

/// Save the upload, validate it and run the pipeline off the async
/// runtime. The original is always removed; the processed file only
/// survives on success.
async fn store_and_convert(
    state: &AppState,
    original_name: &str,
    bytes: Bytes,
) -> Result<(String, ConversionReport), UploadError> {
    let id = Uuid::new_v4();
    let upload_path = state.store.original_path(&id, original_name);
    let processed_name = TempStore::processed_name(&id, original_name);
    let processed_path = state.store.path_for(&processed_name);

    tokio::fs::write(&upload_path, &bytes).await?;
    info!(file = %original_name, path = %upload_path.display(), "file uploaded");

    let result = run_pipeline(
        upload_path.clone(),
        processed_path.clone(),
        state.max_content_length as u64,
        state.convert.clone(),
    )
    .await;

    discard(&upload_path).await;
    if result.is_err() {
        discard(&processed_path).await;
    }
    result.map(|report| (processed_name, report))
}

async fn run_pipeline(
    upload_path: PathBuf,
    processed_path: PathBuf,
    max_len: u64,
    options: Arc<ConvertOptions>,
) -> Result<ConversionReport, UploadError> {
    tokio::task::spawn_blocking(move || -> Result<ConversionReport, UploadError> {
        validate_excel_file(&upload_path, max_len)?;
        Ok(process_file(&upload_path, &processed_path, &options)?)
    })
    .await?
}

pub async fn download(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    info!(%filename, "download requested");

    let resolved = match state.store.resolve_download(&filename) {
        Ok(resolved) => resolved,
        Err(err @ DownloadError::OutsideRoot(_)) => {
            warn!(%filename, error = %err, "download blocked");
            return Notice::NotFound.redirect().into_response();
        }
        Err(err) => {
            info!(%filename, error = %err, "download not available");
            return Notice::NotFound.redirect().into_response();
        }
    };

    let body = match tokio::fs::read(&resolved.path).await {
        Ok(body) => body,
        Err(err) => {
            error!(path = %resolved.path.display(), error = %err, "error reading download");
            return Notice::DownloadFailed.redirect().into_response();
        }
    };

    let attachment = download_name(&resolved.stored_name);
    info!(path = %resolved.path.display(), %attachment, "serving file");
    (
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{attachment}\""),
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("reporte.xlsx"));
        assert!(allowed_file("VIEJO.XLS"));
        assert!(allowed_file("a.b.xlsx"));
        assert!(!allowed_file("test.txt"));
        assert!(!allowed_file("xlsx"));
        assert!(!allowed_file("reporte.xlsm"));
    }

    #[tokio::test]
    async fn test_health_handler_directly() {
        let Json(health) = health().await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }
}
