use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Mini-game a session belongs to. Each variant owns one `SessionState` shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    #[sea_orm(string_value = "EMOJI_CHARADES")]
    EmojiCharades,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_type")]
    pub game_type: GameType,
    #[sea_orm(column_name = "player_a")]
    pub player_a: i64,
    #[sea_orm(column_name = "player_b")]
    pub player_b: i64,
    /// `min(player_a, player_b)`; with `pair_high` keys the live-pair unique index.
    #[sea_orm(column_name = "pair_low")]
    pub pair_low: i64,
    #[sea_orm(column_name = "pair_high")]
    pub pair_high: i64,
    #[sea_orm(column_name = "turn_owner")]
    pub turn_owner: i64,
    /// Game-specific blob; decoded through `domain::session_state::SessionState`.
    #[sea_orm(column_type = "Json")]
    pub state: Json,
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    #[sea_orm(column_name = "archived_at")]
    pub archived_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::PlayerA",
        to = "super::profiles::Column::Id"
    )]
    PlayerA,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::PlayerB",
        to = "super::profiles::Column::Id"
    )]
    PlayerB,
}

impl ActiveModelBehavior for ActiveModel {}
