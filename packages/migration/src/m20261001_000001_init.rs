use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    UserKey,
    DisplayName,
    Role,
    AvatarUrl,
    Xp,
    Level,
    Streak,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GameSessions {
    Table,
    Id,
    GameType,
    PlayerA,
    PlayerB,
    PairLow,
    PairHigh,
    TurnOwner,
    State,
    LockVersion,
    CreatedAt,
    UpdatedAt,
    ArchivedAt,
}

#[derive(Iden)]
enum RewardGrants {
    Table,
    Id,
    EventKey,
    ProfileId,
    Amount,
    CreatedAt,
}

#[derive(Iden)]
enum Missions {
    Table,
    Id,
    Title,
    Description,
    Duration,
    Xp,
    Owner,
    Emoji,
    Status,
    ProofUrl,
    SubmittedBy,
    CreatedBy,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // profiles
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Profiles::UserKey).string().not_null())
                    .col(ColumnDef::new(Profiles::DisplayName).string().not_null())
                    .col(ColumnDef::new(Profiles::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Profiles::AvatarUrl).string().null())
                    .col(
                        ColumnDef::new(Profiles::Xp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profiles::Level)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Profiles::Streak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(created_at(Profiles::CreatedAt))
                    .col(created_at(Profiles::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_profiles_user_key")
                    .table(Profiles::Table)
                    .col(Profiles::UserKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // game_sessions
        manager
            .create_table(
                Table::create()
                    .table(GameSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSessions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::GameType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameSessions::PlayerA).big_integer().not_null())
                    .col(ColumnDef::new(GameSessions::PlayerB).big_integer().not_null())
                    .col(ColumnDef::new(GameSessions::PairLow).big_integer().not_null())
                    .col(ColumnDef::new(GameSessions::PairHigh).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameSessions::TurnOwner)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameSessions::State).json().not_null())
                    .col(
                        ColumnDef::new(GameSessions::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(created_at(GameSessions::CreatedAt))
                    .col(created_at(GameSessions::UpdatedAt))
                    .col(
                        ColumnDef::new(GameSessions::ArchivedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_sessions_player_a")
                            .from(GameSessions::Table, GameSessions::PlayerA)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_sessions_player_b")
                            .from(GameSessions::Table, GameSessions::PlayerB)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_sessions_turn_owner")
                            .from(GameSessions::Table, GameSessions::TurnOwner)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_game_sessions_pair")
                    .table(GameSessions::Table)
                    .col(GameSessions::GameType)
                    .col(GameSessions::PairLow)
                    .col(GameSessions::PairHigh)
                    .to_owned(),
            )
            .await?;

        // At most one live session per unordered pair (partial index, raw SQL).
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_game_sessions_live_pair \
                 ON game_sessions (game_type, pair_low, pair_high) \
                 WHERE archived_at IS NULL",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_game_sessions_updated_at")
                    .table(GameSessions::Table)
                    .col(GameSessions::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        // reward_grants
        manager
            .create_table(
                Table::create()
                    .table(RewardGrants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewardGrants::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(RewardGrants::EventKey).string().not_null())
                    .col(
                        ColumnDef::new(RewardGrants::ProfileId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RewardGrants::Amount).big_integer().not_null())
                    .col(created_at(RewardGrants::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reward_grants_profile_id")
                            .from(RewardGrants::Table, RewardGrants::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_reward_grants_event_key")
                    .table(RewardGrants::Table)
                    .col(RewardGrants::EventKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // missions
        manager
            .create_table(
                Table::create()
                    .table(Missions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Missions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Missions::Title).string().not_null())
                    .col(ColumnDef::new(Missions::Description).text().not_null())
                    .col(ColumnDef::new(Missions::Duration).string_len(32).not_null())
                    .col(ColumnDef::new(Missions::Xp).integer().not_null())
                    .col(ColumnDef::new(Missions::Owner).string_len(16).not_null())
                    .col(ColumnDef::new(Missions::Emoji).string_len(16).not_null())
                    .col(ColumnDef::new(Missions::Status).string_len(24).not_null())
                    .col(ColumnDef::new(Missions::ProofUrl).string().null())
                    .col(ColumnDef::new(Missions::SubmittedBy).big_integer().null())
                    .col(ColumnDef::new(Missions::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Missions::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(created_at(Missions::CreatedAt))
                    .col(created_at(Missions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_missions_submitted_by")
                            .from(Missions::Table, Missions::SubmittedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_missions_created_by")
                            .from(Missions::Table, Missions::CreatedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_missions_status")
                    .table(Missions::Table)
                    .col(Missions::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order
        manager
            .drop_table(Table::drop().table(Missions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(RewardGrants::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(GameSessions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
