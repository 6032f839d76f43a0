//! Picture-in-picture playlist. Ranks are unique across the whole playlist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::entities::placed_entry::EntryKind;
use crate::error::AppError;
use crate::routes::entries::{self, EntryJson, EntryListJson};
use crate::routes::upload::EntrySubmission;
use crate::routes::AppState;

const KIND: EntryKind = EntryKind::PipVideo;

#[utoipa::path(
    post,
    path = "/api/pip-videos",
    tag = "PiP Videos",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Entry created", body = crate::response::ApiResponse<entries::EntryResponse>),
        (status = 400, description = "Validation, conflict or upload error"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_pip_video(
    State(state): State<AppState>,
    submission: EntrySubmission,
) -> Result<(StatusCode, EntryJson), AppError> {
    entries::create(&state, KIND, submission).await
}

#[utoipa::path(
    get,
    path = "/api/pip-videos",
    tag = "PiP Videos",
    responses(
        (status = 200, description = "All entries in display order", body = crate::response::ApiResponse<Vec<entries::EntryResponse>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_pip_videos(State(state): State<AppState>) -> Result<EntryListJson, AppError> {
    entries::list(&state, KIND).await
}

#[utoipa::path(
    get,
    path = "/api/pip-videos/{id}",
    tag = "PiP Videos",
    params(
        ("id" = String, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry details", body = crate::response::ApiResponse<entries::EntryResponse>),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn get_pip_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<EntryJson, AppError> {
    entries::get(&state, KIND, &id).await
}

#[utoipa::path(
    put,
    path = "/api/pip-videos/{id}",
    tag = "PiP Videos",
    params(
        ("id" = String, Path, description = "Entry ID")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Entry updated", body = crate::response::ApiResponse<entries::EntryResponse>),
        (status = 400, description = "Validation, conflict or upload error"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn update_pip_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    submission: EntrySubmission,
) -> Result<EntryJson, AppError> {
    entries::update(&state, KIND, &id, submission).await
}

#[utoipa::path(
    delete,
    path = "/api/pip-videos/{id}",
    tag = "PiP Videos",
    params(
        ("id" = String, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry and its media deleted"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn delete_pip_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::Json<crate::response::ApiResponse<()>>, AppError> {
    entries::delete(&state, KIND, &id).await
}
