use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_types")]
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
    #[sea_orm(has_many = "super::business_payment_type::Entity")]
    BusinessPaymentTypes,
}

impl Related<super::business_payment_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessPaymentTypes.def()
    }
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        super::business_payment_type::Relation::Business.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::business_payment_type::Relation::PaymentType.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
