//! Prize image upload, the one multipart endpoint.
//!
//! Accepts a single `image` field, refuses anything that is not an image or
//! is over the configured size limit, and stores it under the upload
//! directory with a unique name. Stored files are served back under
//! `/uploads/`.

use std::{path::Path as FsPath, sync::Arc};

use axum::{
    extract::{FromRef, Multipart, State},
    Json,
};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;

use crate::{error::AppError, state::AppState};

/// The slice of app state the upload route needs.
#[derive(Clone)]
pub struct UploadConfig {
    pub upload_dir: String,
    pub max_upload_bytes: usize,
}

impl FromRef<Arc<AppState>> for UploadConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        Self {
            upload_dir: state.config.upload_dir.clone(),
            max_upload_bytes: state.config.max_upload_bytes,
        }
    }
}

/// Transport-level body cap for the upload route. Multipart framing adds
/// boundary and header bytes on top of the image itself, so the cap sits
/// above the configured limit and the handler's own size check is the one
/// that rejects oversized files.
pub fn body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes + 64 * 1024
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub image_url: String,
    pub filename: String,
    pub size: usize,
}

pub async fn upload_image(
    State(cfg): State<UploadConfig>,
    mut multipart: Multipart,
) -> Result<Json<UploadedImage>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(AppError::Validation(
                "only image files are accepted".to_string(),
            ));
        }

        let extension = field
            .file_name()
            .and_then(|name| FsPath::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?;
        if data.len() > cfg.max_upload_bytes {
            return Err(AppError::Validation(format!(
                "image exceeds the {} byte limit",
                cfg.max_upload_bytes
            )));
        }

        let filename = format!(
            "prize-{}-{}{}",
            Utc::now().timestamp_millis(),
            rand::thread_rng().gen_range(0..1_000_000_000u32),
            extension
        );

        tokio::fs::create_dir_all(&cfg.upload_dir).await?;
        let path = FsPath::new(&cfg.upload_dir).join(&filename);
        let size = data.len();
        tokio::fs::write(&path, data).await?;

        return Ok(Json(UploadedImage {
            image_url: format!("/uploads/{filename}"),
            filename,
            size,
        }));
    }

    Err(AppError::Validation("no file uploaded".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::DefaultBodyLimit,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOUNDARY: &str = "image-upload-test";

    fn multipart_body(payload: &[u8], content_type: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"prize.png\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn test_router(max_upload_bytes: usize) -> Router {
        let cfg = UploadConfig {
            upload_dir: std::env::temp_dir()
                .join(format!("lottery-uploads-{}", rand::thread_rng().gen::<u64>()))
                .to_string_lossy()
                .into_owned(),
            max_upload_bytes,
        };

        Router::new()
            .route("/images/upload", post(upload_image))
            .layer(DefaultBodyLimit::max(body_limit(max_upload_bytes)))
            .with_state(cfg)
    }

    async fn send(router: Router, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/images/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn upload_larger_than_axum_default_cap_succeeds() {
        // 3 MB sits above axum's stock 2 MB body limit but below the
        // configured 5 MiB; the route's own limit must be the one in force.
        let max = 5 * 1024 * 1024;
        let payload = vec![0u8; 3 * 1024 * 1024];

        let (status, body) = send(test_router(max), multipart_body(&payload, "image/png")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["size"], 3 * 1024 * 1024);
        assert!(body["imageUrl"]
            .as_str()
            .unwrap()
            .starts_with("/uploads/prize-"));
    }

    #[tokio::test]
    async fn upload_over_configured_limit_gets_enveloped_400() {
        let max = 1024;
        let payload = vec![0u8; 2048];

        let (status, body) = send(test_router(max), multipart_body(&payload, "image/png")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected() {
        let (status, body) = send(
            test_router(1024 * 1024),
            multipart_body(b"hello", "text/plain"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("only image files"));
    }
}
