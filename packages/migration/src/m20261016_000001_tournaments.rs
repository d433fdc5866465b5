use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, Expr, ForeignKey, Index, IndexOrder, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Players {
    Table,
    Id,
    Username,
    Level,
    Coins,
    Country,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tournaments {
    Table,
    Id,
    StartsAt,
    EndsAt,
    Active,
    GroupIndex,
    GroupCount,
    UpdatedAt,
}

#[derive(Iden)]
enum TournamentEntries {
    Table,
    TournamentId,
    UserId,
    Score,
    GroupId,
    ClaimedReward,
    ClaimedAt,
    EnteredAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Players::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Players::Username).string().not_null())
                    .col(
                        ColumnDef::new(Players::Level)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Players::Level).gte(1)),
                    )
                    .col(
                        ColumnDef::new(Players::Coins)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Players::Coins).gte(0)),
                    )
                    .col(ColumnDef::new(Players::Country).string_len(2).null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // global level leaderboard
        manager
            .create_index(
                Index::create()
                    .name("ix_players_level")
                    .table(Players::Table)
                    .col((Players::Level, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // per-country level leaderboard
        manager
            .create_index(
                Index::create()
                    .name("ix_players_country_level")
                    .table(Players::Table)
                    .col(Players::Country)
                    .col((Players::Level, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // tournaments (one row per UTC day)
        manager
            .create_table(
                Table::create()
                    .table(Tournaments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tournaments::Id)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tournaments::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tournaments::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tournaments::Active).boolean().not_null())
                    .col(
                        ColumnDef::new(Tournaments::GroupIndex)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Tournaments::GroupIndex).gte(1)),
                    )
                    .col(
                        ColumnDef::new(Tournaments::GroupCount)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Tournaments::GroupCount).between(0, 35)),
                    )
                    .col(
                        ColumnDef::new(Tournaments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // tournament_entries
        manager
            .create_table(
                Table::create()
                    .table(TournamentEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TournamentEntries::TournamentId)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TournamentEntries::UserId).string().not_null())
                    .col(
                        ColumnDef::new(TournamentEntries::Score)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(TournamentEntries::Score).gte(0)),
                    )
                    .col(ColumnDef::new(TournamentEntries::GroupId).string().not_null())
                    .col(
                        ColumnDef::new(TournamentEntries::ClaimedReward)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TournamentEntries::ClaimedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TournamentEntries::EnteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_tournament_entries")
                            .col(TournamentEntries::TournamentId)
                            .col(TournamentEntries::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tournament_entries_tournament_id")
                            .from(TournamentEntries::Table, TournamentEntries::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tournament_entries_user_id")
                            .from(TournamentEntries::Table, TournamentEntries::UserId)
                            .to(Players::Table, Players::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // group leaderboard: score desc within a group
        manager
            .create_index(
                Index::create()
                    .name("ix_tournament_entries_group_score")
                    .table(TournamentEntries::Table)
                    .col(TournamentEntries::GroupId)
                    .col((TournamentEntries::Score, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ix_tournament_entries_group_score")
                    .table(TournamentEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(TournamentEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tournaments::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_players_country_level")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("ix_players_level")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;

        Ok(())
    }
}
