use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoListResponse {
    /// Video names with the `rawvideo/` prefix removed
    pub videos: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadedObject {
    #[serde(rename = "Key")]
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub data: UploadedObject,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadUrlResponse {
    pub url: String,
    /// Validity of `url` in seconds
    pub expires_in: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

/// Multipart body accepted by `POST /upload`
#[derive(Deserialize, ToSchema)]
pub struct UploadForm {
    #[serde(rename = "videoFile")]
    #[schema(value_type = String, format = Binary)]
    pub video_file: Vec<u8>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FileNameQuery {
    /// Name of the video, without the `rawvideo/` prefix
    #[serde(rename = "fileName", default)]
    #[validate(length(min = 1, message = "fileName is required"))]
    pub file_name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VideoNameQuery {
    #[serde(rename = "videoName")]
    pub video_name: Option<String>,
}
