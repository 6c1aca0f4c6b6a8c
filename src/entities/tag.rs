use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[serde(skip_serializing)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_serializing)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::business_tag::Entity")]
    BusinessTags,
}

impl Related<super::business_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessTags.def()
    }
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        super::business_tag::Relation::Business.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::business_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
