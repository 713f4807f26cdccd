use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilyRole {
    #[sea_orm(string_value = "DAD")]
    Dad,
    #[sea_orm(string_value = "MUM")]
    Mum,
    #[sea_orm(string_value = "SON")]
    Son,
    #[sea_orm(string_value = "DAUGHTER")]
    Daughter,
}

impl FamilyRole {
    pub fn is_parent(self) -> bool {
        matches!(self, FamilyRole::Dad | FamilyRole::Mum)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "user_key", unique)]
    pub user_key: String,
    #[sea_orm(column_name = "display_name")]
    pub display_name: String,
    pub role: FamilyRole,
    #[sea_orm(column_name = "avatar_url")]
    pub avatar_url: Option<String>,
    pub xp: i64,
    pub level: i32,
    pub streak: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reward_grants::Entity")]
    RewardGrants,
}

impl Related<super::reward_grants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RewardGrants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
