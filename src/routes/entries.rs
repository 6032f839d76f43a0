//! Handler bodies shared by the content, popular-brand and PiP-video routes.

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::placed_entry::{self, EntryKind, EntryStatus};
use crate::error::AppError;
use crate::models::media::MediaDescriptor;
use crate::response::ApiResponse;
use crate::routes::upload::EntrySubmission;
use crate::routes::AppState;
use crate::services::entries::not_found;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<i32>,
    pub rank: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay_speed: Option<i32>,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntryStatus>,
    pub media: MediaDescriptor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<placed_entry::Model> for EntryResponse {
    fn from(entry: placed_entry::Model) -> Self {
        let media = entry.media();
        EntryResponse {
            id: entry.id,
            brand_name: entry.brand_name,
            description: entry.description,
            category: entry.category,
            tile: entry.tile,
            rank: entry.rank,
            priority: entry.kind.placement().branded.then_some(entry.priority),
            autoplay_speed: entry.autoplay_speed,
            link: entry.link,
            start_date_time: entry.start_date_time,
            end_date_time: entry.end_date_time,
            status: entry.status,
            media,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

pub type EntryJson = Json<ApiResponse<EntryResponse>>;
pub type EntryListJson = Json<ApiResponse<Vec<EntryResponse>>>;

/// Unknown and malformed ids both read as a missing entry.
pub fn parse_id(kind: EntryKind, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| not_found(kind))
}

fn label(kind: EntryKind) -> &'static str {
    kind.placement().label
}

pub async fn create(
    state: &AppState,
    kind: EntryKind,
    submission: EntrySubmission,
) -> Result<(StatusCode, EntryJson), AppError> {
    let entry = state
        .entries
        .create(kind, &submission.form, submission.media)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::data(EntryResponse::from(entry))
                .with_message(format!("{} saved successfully", label(kind))),
        ),
    ))
}

pub async fn list(state: &AppState, kind: EntryKind) -> Result<EntryListJson, AppError> {
    let entries = state.entries.list(kind).await?;
    Ok(Json(ApiResponse::list(
        entries.into_iter().map(EntryResponse::from).collect(),
    )))
}

pub async fn list_live(state: &AppState, kind: EntryKind) -> Result<EntryListJson, AppError> {
    let entries = state.entries.list_live(kind, Utc::now()).await?;
    Ok(Json(ApiResponse::list(
        entries.into_iter().map(EntryResponse::from).collect(),
    )))
}

pub async fn get(state: &AppState, kind: EntryKind, id: &str) -> Result<EntryJson, AppError> {
    let entry = state.entries.get(kind, parse_id(kind, id)?).await?;
    Ok(Json(ApiResponse::data(EntryResponse::from(entry))))
}

pub async fn update(
    state: &AppState,
    kind: EntryKind,
    id: &str,
    submission: EntrySubmission,
) -> Result<EntryJson, AppError> {
    let entry = state
        .entries
        .update(kind, parse_id(kind, id)?, &submission.form, submission.media)
        .await?;

    Ok(Json(
        ApiResponse::data(EntryResponse::from(entry))
            .with_message(format!("{} updated successfully", label(kind))),
    ))
}

pub async fn toggle_status(
    state: &AppState,
    kind: EntryKind,
    id: &str,
) -> Result<EntryJson, AppError> {
    let entry = state.entries.toggle_status(kind, parse_id(kind, id)?).await?;
    let status = match entry.status {
        Some(EntryStatus::Inactive) => "inactive",
        _ => "active",
    };

    Ok(Json(
        ApiResponse::data(EntryResponse::from(entry))
            .with_message(format!("Status changed to {}", status)),
    ))
}

pub async fn delete(
    state: &AppState,
    kind: EntryKind,
    id: &str,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.entries.delete(kind, parse_id(kind, id)?).await?;
    Ok(Json(ApiResponse::message(format!(
        "{} deleted successfully",
        label(kind)
    ))))
}
