//! Create/read/update/delete flow shared by every placed-entry kind.
//!
//! Each mutation is a short, unguarded sequence: validate, look up rank conflicts,
//! touch object storage, write the record. Nothing spans the storage call and the
//! record write, so a crash in between can orphan an object. Two concurrent writers
//! can also both pass the rank lookup for the same slot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::placed_entry::{self, EntryKind, EntryStatus};
use crate::error::AppError;
use crate::models::placement::RankScope;
use crate::services::media::{self, MediaStore, MediaUpload};
use crate::services::ordering;
use crate::services::repository::{EntryRepository, RankClaim};
use crate::services::validation::{self, EntryDraft, EntryForm, FieldError};

#[derive(Clone)]
pub struct EntryService {
    repo: Arc<dyn EntryRepository>,
    media: Arc<dyn MediaStore>,
}

impl EntryService {
    pub fn new(repo: Arc<dyn EntryRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { repo, media }
    }

    pub async fn create(
        &self,
        kind: EntryKind,
        form: &EntryForm,
        upload: Option<MediaUpload>,
    ) -> Result<placed_entry::Model, AppError> {
        let draft = validation::validate_create(kind, form).map_err(into_validation)?;
        let upload = upload
            .ok_or_else(|| AppError::Validation(vec!["Image/Media file is required".into()]))?;
        self.check_rank(kind, &draft, None).await?;

        let media = self.media.upload(&upload).await?;
        let now = Utc::now();
        let mut entry = placed_entry::Model {
            id: Uuid::new_v4(),
            kind,
            brand_name: None,
            description: None,
            category: None,
            tile: None,
            rank: 0,
            priority: false,
            autoplay_speed: None,
            link: String::new(),
            start_date_time: None,
            end_date_time: None,
            status: None,
            media_url: String::new(),
            media_public_id: String::new(),
            media_kind: media.kind,
            media_filename: String::new(),
            created_at: now,
            updated_at: now,
        };
        draft.apply_to(&mut entry);
        entry.set_media(media.clone());

        match self.repo.create(entry).await {
            Ok(created) => {
                tracing::info!(kind = ?kind, id = %created.id, "entry created");
                Ok(created)
            }
            Err(e) => {
                // The record never landed, so nothing owns the fresh upload.
                media::release(self.media.as_ref(), &media).await;
                Err(e.into())
            }
        }
    }

    pub async fn list(&self, kind: EntryKind) -> Result<Vec<placed_entry::Model>, AppError> {
        let mut entries = self.repo.find(kind).await?;
        ordering::sort_for_display(&mut entries);
        Ok(entries)
    }

    pub async fn list_live(
        &self,
        kind: EntryKind,
        now: DateTime<Utc>,
    ) -> Result<Vec<placed_entry::Model>, AppError> {
        let entries = self.repo.find(kind).await?;
        Ok(ordering::live_projection(entries, now))
    }

    pub async fn get(&self, kind: EntryKind, id: Uuid) -> Result<placed_entry::Model, AppError> {
        self.repo
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| not_found(kind))
    }

    /// Applies the submitted fields. A new upload replaces the media descriptor, and the
    /// previous object is released once the record is saved; without one the current
    /// media is kept.
    pub async fn update(
        &self,
        kind: EntryKind,
        id: Uuid,
        form: &EntryForm,
        upload: Option<MediaUpload>,
    ) -> Result<placed_entry::Model, AppError> {
        let mut entry = self.get(kind, id).await?;
        let draft =
            validation::validate_update(kind, form, &entry).map_err(into_validation)?;
        self.check_rank(kind, &draft, Some(id)).await?;

        draft.apply_to(&mut entry);
        // (fresh, previous) when the media is being replaced.
        let replaced = match upload {
            Some(upload) => {
                let fresh = self.media.upload(&upload).await?;
                let previous = entry.media();
                entry.set_media(fresh.clone());
                Some((fresh, previous))
            }
            None => None,
        };
        entry.updated_at = Utc::now();

        match self.repo.update(entry).await {
            Ok(updated) => {
                if let Some((_, previous)) = &replaced {
                    media::release(self.media.as_ref(), previous).await;
                }
                tracing::info!(kind = ?kind, id = %updated.id, "entry updated");
                Ok(updated)
            }
            Err(e) => {
                // The stored record still points at the previous object.
                if let Some((fresh, _)) = &replaced {
                    media::release(self.media.as_ref(), fresh).await;
                }
                Err(e.into())
            }
        }
    }

    pub async fn toggle_status(
        &self,
        kind: EntryKind,
        id: Uuid,
    ) -> Result<placed_entry::Model, AppError> {
        if !kind.placement().has_status {
            return Err(not_found(kind));
        }
        let mut entry = self.get(kind, id).await?;
        entry.status = Some(match entry.status {
            Some(EntryStatus::Active) => EntryStatus::Inactive,
            _ => EntryStatus::Active,
        });
        entry.updated_at = Utc::now();

        let updated = self.repo.update(entry).await?;
        tracing::info!(kind = ?kind, id = %updated.id, status = ?updated.status, "status toggled");
        Ok(updated)
    }

    /// Removes the entry. Its media is released first on a best-effort basis; the
    /// record is deleted whether or not that succeeds.
    pub async fn delete(&self, kind: EntryKind, id: Uuid) -> Result<(), AppError> {
        let entry = self.get(kind, id).await?;
        media::release(self.media.as_ref(), &entry.media()).await;

        if self.repo.delete(kind, id).await? == 0 {
            return Err(not_found(kind));
        }
        tracing::info!(kind = ?kind, id = %id, "entry deleted");
        Ok(())
    }

    async fn check_rank(
        &self,
        kind: EntryKind,
        draft: &EntryDraft,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        if !draft.claims_rank(kind) {
            return Ok(());
        }
        let scope = kind.placement().rank_scope;
        let claim = RankClaim {
            kind,
            rank: draft.rank,
            tile: if scope == RankScope::PerTile { draft.tile } else { None },
            priority_only: scope == RankScope::PerTile,
            exclude,
        };

        if self.repo.find_rank_holder(&claim).await?.is_none() {
            return Ok(());
        }
        Err(AppError::Conflict(match (scope, draft.tile) {
            (RankScope::PerTile, Some(tile)) => format!(
                "Rank {} already exists in Tile {} with priority. Please provide a unique rank value.",
                draft.rank, tile
            ),
            _ => format!(
                "Rank {} is already assigned to another video. Please use a unique rank.",
                draft.rank
            ),
        }))
    }
}

pub fn not_found(kind: EntryKind) -> AppError {
    AppError::NotFound(format!("{} not found", kind.placement().label))
}

fn into_validation(errors: Vec<FieldError>) -> AppError {
    AppError::Validation(errors.into_iter().map(|e| e.message).collect())
}
