//! Persistence for placed entries.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::placed_entry::{self, EntryKind, Entity as PlacedEntry};

/// A rank an entry wants to hold, and the entries it must not collide with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankClaim {
    pub kind: EntryKind,
    pub rank: i32,
    /// Restricts the lookup to one tile when set.
    pub tile: Option<i32>,
    /// Only priority entries hold their rank.
    pub priority_only: bool,
    /// The entry being updated, which never conflicts with itself.
    pub exclude: Option<Uuid>,
}

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn create(&self, entry: placed_entry::Model) -> Result<placed_entry::Model, DbErr>;

    async fn find(&self, kind: EntryKind) -> Result<Vec<placed_entry::Model>, DbErr>;

    async fn find_by_id(
        &self,
        kind: EntryKind,
        id: Uuid,
    ) -> Result<Option<placed_entry::Model>, DbErr>;

    /// Returns an entry already holding the claimed rank, if any.
    async fn find_rank_holder(
        &self,
        claim: &RankClaim,
    ) -> Result<Option<placed_entry::Model>, DbErr>;

    async fn update(&self, entry: placed_entry::Model) -> Result<placed_entry::Model, DbErr>;

    /// Returns the number of rows removed.
    async fn delete(&self, kind: EntryKind, id: Uuid) -> Result<u64, DbErr>;
}

pub struct SeaOrmEntryRepository {
    db: DatabaseConnection,
}

impl SeaOrmEntryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryRepository for SeaOrmEntryRepository {
    async fn create(&self, entry: placed_entry::Model) -> Result<placed_entry::Model, DbErr> {
        entry.into_active_model().reset_all().insert(&self.db).await
    }

    async fn find(&self, kind: EntryKind) -> Result<Vec<placed_entry::Model>, DbErr> {
        PlacedEntry::find()
            .filter(placed_entry::Column::Kind.eq(kind))
            .order_by_asc(placed_entry::Column::Tile)
            .order_by_desc(placed_entry::Column::Priority)
            .order_by_asc(placed_entry::Column::Rank)
            .order_by_asc(placed_entry::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    async fn find_by_id(
        &self,
        kind: EntryKind,
        id: Uuid,
    ) -> Result<Option<placed_entry::Model>, DbErr> {
        PlacedEntry::find_by_id(id)
            .filter(placed_entry::Column::Kind.eq(kind))
            .one(&self.db)
            .await
    }

    async fn find_rank_holder(
        &self,
        claim: &RankClaim,
    ) -> Result<Option<placed_entry::Model>, DbErr> {
        let mut query = PlacedEntry::find()
            .filter(placed_entry::Column::Kind.eq(claim.kind))
            .filter(placed_entry::Column::Rank.eq(claim.rank));

        if let Some(tile) = claim.tile {
            query = query.filter(placed_entry::Column::Tile.eq(tile));
        }
        if claim.priority_only {
            query = query.filter(placed_entry::Column::Priority.eq(true));
        }
        if let Some(id) = claim.exclude {
            query = query.filter(placed_entry::Column::Id.ne(id));
        }

        query.one(&self.db).await
    }

    async fn update(&self, entry: placed_entry::Model) -> Result<placed_entry::Model, DbErr> {
        entry.into_active_model().reset_all().update(&self.db).await
    }

    async fn delete(&self, kind: EntryKind, id: Uuid) -> Result<u64, DbErr> {
        let res = PlacedEntry::delete_many()
            .filter(placed_entry::Column::Id.eq(id))
            .filter(placed_entry::Column::Kind.eq(kind))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }
}
