use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business_payment_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub business_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub payment_type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::business::Entity",
        from = "Column::BusinessId",
        to = "super::business::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Business,
    #[sea_orm(
        belongs_to = "super::payment_type::Entity",
        from = "Column::PaymentTypeId",
        to = "super::payment_type::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    PaymentType,
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl Related<super::payment_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
