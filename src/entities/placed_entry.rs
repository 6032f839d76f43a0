use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::media::MediaDescriptor;

/// One row per brand, featured brand or PiP video. Columns that do not apply to a
/// kind stay NULL.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "placed_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: EntryKind,
    pub brand_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub category: Option<String>,
    pub tile: Option<i32>,
    pub rank: i32,
    pub priority: bool,
    pub autoplay_speed: Option<i32>,
    pub link: String,
    pub start_date_time: Option<DateTimeUtc>,
    pub end_date_time: Option<DateTimeUtc>,
    pub status: Option<EntryStatus>,
    pub media_url: String,
    pub media_public_id: String,
    pub media_kind: MediaKind,
    pub media_filename: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    #[sea_orm(string_value = "content")]
    Content,
    #[sea_orm(string_value = "popular_brand")]
    PopularBrand,
    #[sea_orm(string_value = "pip_video")]
    PipVideo,
}

#[derive(EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "gif")]
    Gif,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn media(&self) -> MediaDescriptor {
        MediaDescriptor {
            url: self.media_url.clone(),
            public_id: self.media_public_id.clone(),
            kind: self.media_kind,
            filename: self.media_filename.clone(),
        }
    }

    pub fn set_media(&mut self, media: MediaDescriptor) {
        self.media_url = media.url;
        self.media_public_id = media.public_id;
        self.media_kind = media.kind;
        self.media_filename = media.filename;
    }

    pub fn is_active(&self) -> bool {
        self.status == Some(EntryStatus::Active)
    }
}
