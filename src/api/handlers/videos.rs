use crate::AppState;
use crate::api::error::AppError;
use crate::models::{
    DownloadUrlResponse, ErrorResponse, FileNameQuery, UploadForm, UploadResponse, UploadedObject,
    VideoListResponse,
};
use crate::services::catalog::DOWNLOAD_URL_TTL;
use crate::services::staging::upload_file_name;
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use tokio_util::io::{ReaderStream, StreamReader};
use validator::Validate;

/// Multipart field carrying the uploaded video.
pub const VIDEO_FIELD: &str = "videoFile";

#[utoipa::path(
    get,
    path = "/list_videos",
    responses(
        (status = 200, description = "Names of uploaded .mp4 videos", body = VideoListResponse),
        (status = 500, description = "Listing failed or the bucket prefix is empty", body = ErrorResponse)
    ),
    tag = "videos"
)]
pub async fn list_videos(
    State(state): State<AppState>,
) -> Result<Json<VideoListResponse>, AppError> {
    let videos = state
        .catalog
        .list_videos()
        .await
        .map_err(AppError::storage("Error listing videos"))?;

    Ok(Json(VideoListResponse { videos }))
}

#[utoipa::path(
    get,
    path = "/download",
    params(FileNameQuery),
    responses(
        (status = 200, description = "Video bytes as an attachment"),
        (status = 400, description = "fileName missing", body = ErrorResponse),
        (status = 500, description = "Object could not be fetched", body = ErrorResponse)
    ),
    tag = "videos"
)]
pub async fn download_video(
    State(state): State<AppState>,
    Query(query): Query<FileNameQuery>,
) -> Result<Response, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let file_name = query.file_name;

    // Non-ASCII names are passed through as raw bytes, as browsers expect.
    let content_disposition =
        HeaderValue::from_bytes(format!("attachment; filename=\"{}\"", file_name).as_bytes())
            .map_err(|_| {
                AppError::Validation(format!("fileName is not a valid header value: {file_name}"))
            })?;

    let object = state
        .catalog
        .open(&file_name)
        .await
        .map_err(AppError::storage("Error getting file from S3"))?;

    let content_type = object
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    tracing::info!("📥 Streaming {} ({:?} bytes)", file_name, object.content_length);

    let body = Body::from_stream(ReaderStream::new(object.body.into_async_read()));
    let mut response = (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        body,
    )
        .into_response();

    if let Some(length) = object
        .content_length
        .and_then(|l| HeaderValue::from_str(&l.to_string()).ok())
    {
        response.headers_mut().insert(header::CONTENT_LENGTH, length);
    }

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/download_url",
    params(FileNameQuery),
    responses(
        (status = 200, description = "Pre-signed download URL", body = DownloadUrlResponse),
        (status = 400, description = "fileName missing", body = ErrorResponse),
        (status = 500, description = "URL could not be signed", body = ErrorResponse)
    ),
    tag = "videos"
)]
pub async fn download_url(
    State(state): State<AppState>,
    Query(query): Query<FileNameQuery>,
) -> Result<Json<DownloadUrlResponse>, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let url = state
        .catalog
        .download_url(&query.file_name)
        .await
        .map_err(AppError::storage("Error getting file from S3"))?;

    Ok(Json(DownloadUrlResponse {
        url,
        expires_in: DOWNLOAD_URL_TTL.as_secs(),
    }))
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video stored", body = UploadResponse),
        (status = 400, description = "No videoFile field", body = ErrorResponse),
        (status = 500, description = "Staging or storage failed", body = ErrorResponse)
    ),
    tag = "videos"
)]
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut staged = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .and_then(upload_file_name)
            .ok_or_else(|| AppError::Validation("videoFile has no file name".to_string()))?;
        let mime_type = field
            .content_type()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref())
            .to_string();

        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        staged = Some(
            state
                .staging
                .stage(&file_name, &mime_type, reader)
                .await
                .map_err(AppError::local_io("Error uploading file"))?,
        );
        break;
    }

    let staged =
        staged.ok_or_else(|| AppError::Validation(format!("{VIDEO_FIELD} field is required")))?;

    let body = staged
        .body()
        .await
        .map_err(AppError::local_io("Error uploading file"))?;

    // On failure `staged` is dropped here, which removes the temporary file.
    let key = state
        .catalog
        .publish(staged.original_filename(), body, staged.mime_type())
        .await
        .map_err(AppError::storage("Error uploading file"))?;

    tracing::info!("✅ File uploaded successfully: {} ({} bytes)", key, staged.size());

    if let Err(e) = staged.release() {
        tracing::warn!("Failed to remove staged upload for {}: {}", key, e);
    }

    Ok(Json(UploadResponse {
        data: UploadedObject { key },
    }))
}
