//! In-memory stand-ins for the database and object storage.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use sea_orm::DbErr;
use uuid::Uuid;

use crate::entities::placed_entry::{self, EntryKind, EntryStatus, MediaKind};
use crate::error::AppError;
use crate::models::media::{MediaDescriptor, ResourceType};
use crate::services::media::{MediaStore, MediaUpload};
use crate::services::repository::{EntryRepository, RankClaim};

/// A stored entry with a one-month window starting 2026-03-01.
pub fn entry(kind: EntryKind, tile: Option<i32>, priority: bool, rank: i32) -> placed_entry::Model {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let placement = kind.placement();
    placed_entry::Model {
        id: Uuid::new_v4(),
        kind,
        brand_name: placement.branded.then(|| "Acme".to_string()),
        description: placement.branded.then(|| "Spring launch".to_string()),
        category: placement.branded.then(|| "fashion".to_string()),
        tile,
        rank,
        priority,
        autoplay_speed: placement.branded.then_some(3000),
        link: "https://acme.example".to_string(),
        start_date_time: Some(start),
        end_date_time: Some(start + Duration::days(31)),
        status: placement.has_status.then_some(EntryStatus::Active),
        media_url: "https://cdn.example.com/admin-app/image/1-seed.png".to_string(),
        media_public_id: "admin-app/image/1-seed.png".to_string(),
        media_kind: MediaKind::Image,
        media_filename: "seed.png".to_string(),
        created_at: start,
        updated_at: start,
    }
}

impl RankClaim {
    /// In-memory mirror of the rank lookup `SeaOrmEntryRepository` runs in SQL.
    pub fn matches(&self, entry: &placed_entry::Model) -> bool {
        entry.kind == self.kind
            && entry.rank == self.rank
            && self.tile.map_or(true, |tile| entry.tile == Some(tile))
            && (!self.priority_only || entry.priority)
            && self.exclude != Some(entry.id)
    }
}

#[derive(Default)]
pub struct InMemoryEntryRepository {
    entries: Mutex<Vec<placed_entry::Model>>,
    fail_writes: bool,
}

impl InMemoryEntryRepository {
    pub fn with(entries: Vec<placed_entry::Model>) -> Self {
        Self {
            entries: Mutex::new(entries),
            fail_writes: false,
        }
    }

    /// Reads succeed; every insert and update fails.
    pub fn failing_writes(entries: Vec<placed_entry::Model>) -> Self {
        Self {
            fail_writes: true,
            ..Self::with(entries)
        }
    }

    fn check_writable(&self) -> Result<(), DbErr> {
        if self.fail_writes {
            return Err(DbErr::Custom("database unavailable".to_string()));
        }
        Ok(())
    }

    pub fn all(&self) -> Vec<placed_entry::Model> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn create(&self, entry: placed_entry::Model) -> Result<placed_entry::Model, DbErr> {
        self.check_writable()?;
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn find(&self, kind: EntryKind) -> Result<Vec<placed_entry::Model>, DbErr> {
        Ok(self.all().into_iter().filter(|e| e.kind == kind).collect())
    }

    async fn find_by_id(
        &self,
        kind: EntryKind,
        id: Uuid,
    ) -> Result<Option<placed_entry::Model>, DbErr> {
        Ok(self.all().into_iter().find(|e| e.kind == kind && e.id == id))
    }

    async fn find_rank_holder(
        &self,
        claim: &RankClaim,
    ) -> Result<Option<placed_entry::Model>, DbErr> {
        Ok(self.all().into_iter().find(|e| claim.matches(e)))
    }

    async fn update(&self, entry: placed_entry::Model) -> Result<placed_entry::Model, DbErr> {
        self.check_writable()?;
        let mut entries = self.entries.lock().unwrap();
        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| DbErr::RecordNotFound(entry.id.to_string()))?;
        *slot = entry.clone();
        Ok(entry)
    }

    async fn delete(&self, kind: EntryKind, id: Uuid) -> Result<u64, DbErr> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| !(e.kind == kind && e.id == id));
        Ok((before - entries.len()) as u64)
    }
}

/// Records every call; uploads get sequential public ids.
#[derive(Default)]
pub struct RecordingMediaStore {
    uploads: Mutex<Vec<MediaUpload>>,
    destroyed: Mutex<Vec<(String, ResourceType)>>,
    fail_destroy: bool,
}

impl RecordingMediaStore {
    pub fn failing_destroy() -> Self {
        Self {
            fail_destroy: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<MediaUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<(String, ResourceType)> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, upload: &MediaUpload) -> Result<MediaDescriptor, AppError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(upload.clone());
        let public_id = format!(
            "test/{}/{}-{}",
            upload.resource_type().as_str(),
            uploads.len(),
            upload.filename
        );
        Ok(MediaDescriptor {
            url: format!("https://cdn.example.com/{public_id}"),
            public_id,
            kind: upload.kind(),
            filename: upload.filename.clone(),
        })
    }

    async fn destroy(&self, public_id: &str, resource: ResourceType) -> Result<(), AppError> {
        self.destroyed
            .lock()
            .unwrap()
            .push((public_id.to_string(), resource));
        if self.fail_destroy {
            return Err(AppError::Storage("storage unavailable".to_string()));
        }
        Ok(())
    }
}

pub fn upload(filename: &str, content_type: &str) -> MediaUpload {
    MediaUpload {
        filename: filename.to_string(),
        content_type: content_type.to_string(),
        data: vec![0u8; 16],
    }
}
