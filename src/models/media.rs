use serde::{Deserialize, Serialize};

use crate::entities::placed_entry::MediaKind;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Where an uploaded asset lives in object storage. Owned by exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    pub url: String,
    pub public_id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub filename: String,
}

/// Storage-side bucket for an asset. GIFs are stored alongside still images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
    Video,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
        }
    }

    pub fn for_mime(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            ResourceType::Video
        } else {
            ResourceType::Image
        }
    }
}

impl MediaKind {
    pub fn from_mime(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            MediaKind::Video
        } else if content_type == "image/gif" {
            MediaKind::Gif
        } else {
            MediaKind::Image
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            MediaKind::Video => ResourceType::Video,
            MediaKind::Image | MediaKind::Gif => ResourceType::Image,
        }
    }
}

/// Returns true for the MIME types the upload endpoints accept.
pub fn is_allowed_mime(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type.starts_with("video/")
}
