use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A public submission proposing a new directory entry. Created in the same
/// transaction as its pending business; the reference is nulled if that
/// business is ever hard-removed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suggestions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_owner: bool,
    pub business_id: Option<i32>,
    #[serde(skip_serializing)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_serializing)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::business::Entity",
        from = "Column::BusinessId",
        to = "super::business::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Business,
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
