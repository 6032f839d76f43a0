use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlacedEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlacedEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlacedEntries::Kind).string().not_null())
                    .col(ColumnDef::new(PlacedEntries::BrandName).string())
                    .col(ColumnDef::new(PlacedEntries::Description).text())
                    .col(ColumnDef::new(PlacedEntries::Category).string())
                    .col(ColumnDef::new(PlacedEntries::Tile).integer())
                    .col(ColumnDef::new(PlacedEntries::Rank).integer().not_null().default(0))
                    .col(ColumnDef::new(PlacedEntries::Priority).boolean().not_null().default(false))
                    .col(ColumnDef::new(PlacedEntries::AutoplaySpeed).integer())
                    .col(ColumnDef::new(PlacedEntries::Link).string().not_null())
                    .col(ColumnDef::new(PlacedEntries::StartDateTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(PlacedEntries::EndDateTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(PlacedEntries::Status).string())
                    .col(ColumnDef::new(PlacedEntries::MediaUrl).string().not_null())
                    .col(ColumnDef::new(PlacedEntries::MediaPublicId).string().not_null())
                    .col(ColumnDef::new(PlacedEntries::MediaKind).string().not_null())
                    .col(ColumnDef::new(PlacedEntries::MediaFilename).string().not_null())
                    .col(
                        ColumnDef::new(PlacedEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlacedEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Backs the rank conflict lookups; not unique because the check is scoped
        // differently per kind.
        manager
            .create_index(
                Index::create()
                    .name("idx_placed_entries_kind_tile_rank")
                    .table(PlacedEntries::Table)
                    .col(PlacedEntries::Kind)
                    .col(PlacedEntries::Tile)
                    .col(PlacedEntries::Rank)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlacedEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PlacedEntries {
    Table,
    Id,
    Kind,
    BrandName,
    Description,
    Category,
    Tile,
    Rank,
    Priority,
    AutoplaySpeed,
    Link,
    StartDateTime,
    EndDateTime,
    Status,
    MediaUrl,
    MediaPublicId,
    MediaKind,
    MediaFilename,
    CreatedAt,
    UpdatedAt,
}
