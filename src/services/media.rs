use async_trait::async_trait;

use crate::entities::placed_entry::MediaKind;
use crate::error::AppError;
use crate::models::media::{MediaDescriptor, ResourceType};

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MediaUpload {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.content_type)
    }

    pub fn resource_type(&self) -> ResourceType {
        ResourceType::for_mime(&self.content_type)
    }
}

/// External object storage holding entry media.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, upload: &MediaUpload) -> Result<MediaDescriptor, AppError>;

    async fn destroy(&self, public_id: &str, resource: ResourceType) -> Result<(), AppError>;
}

/// Deletes the stored object behind `media`. Failures are logged and swallowed so the
/// caller's record write always goes ahead.
pub async fn release(store: &dyn MediaStore, media: &MediaDescriptor) {
    if media.public_id.is_empty() {
        return;
    }
    let resource = media.kind.resource_type();
    match store.destroy(&media.public_id, resource).await {
        Ok(()) => tracing::info!(public_id = %media.public_id, "old media deleted"),
        Err(e) => tracing::warn!(
            public_id = %media.public_id,
            resource = resource.as_str(),
            error = %e,
            "media delete failed, leaving object behind"
        ),
    }
}
