use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "PENDING_APPROVAL")]
    PendingApproval,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

/// Who a mission is meant for: one family role, or anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionOwner {
    #[sea_orm(string_value = "DAD")]
    Dad,
    #[sea_orm(string_value = "MUM")]
    Mum,
    #[sea_orm(string_value = "SON")]
    Son,
    #[sea_orm(string_value = "DAUGHTER")]
    Daughter,
    #[sea_orm(string_value = "SHARED")]
    Shared,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "missions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub duration: String,
    pub xp: i32,
    pub owner: MissionOwner,
    pub emoji: String,
    pub status: MissionStatus,
    #[sea_orm(column_name = "proof_url")]
    pub proof_url: Option<String>,
    #[sea_orm(column_name = "submitted_by")]
    pub submitted_by: Option<i64>,
    #[sea_orm(column_name = "created_by")]
    pub created_by: Option<i64>,
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::SubmittedBy",
        to = "super::profiles::Column::Id"
    )]
    Submitter,
}

impl ActiveModelBehavior for ActiveModel {}
