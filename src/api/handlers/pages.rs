use crate::AppState;
use crate::api::error::AppError;
use crate::api::extractors::CompanionUrl;
use crate::models::VideoNameQuery;
use axum::{
    extract::{Query, State},
    response::Html,
};

pub async fn home(
    State(state): State<AppState>,
    companion: CompanionUrl,
) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.home(companion.as_str())?))
}

pub async fn face(
    State(state): State<AppState>,
    companion: CompanionUrl,
) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.face(companion.as_str())?))
}

pub async fn pop_upload(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.upload_form()?))
}

/// Pre-detection page for the most recently uploaded video.
pub async fn face_con(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let video_name = state
        .catalog
        .latest_video()
        .await
        .map_err(AppError::storage("Error listing videos"))?;

    Ok(Html(state.pages.face_con(video_name.as_deref())?))
}

pub async fn face_complete(
    State(state): State<AppState>,
    companion: CompanionUrl,
    Query(query): Query<VideoNameQuery>,
) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.face_complete(
        query.video_name.as_deref(),
        companion.as_str(),
    )?))
}
