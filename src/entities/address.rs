use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Province {
    #[sea_orm(string_value = "qc")]
    Qc,
    #[sea_orm(string_value = "on")]
    On,
    #[sea_orm(string_value = "ns")]
    Ns,
    #[sea_orm(string_value = "nb")]
    Nb,
    #[sea_orm(string_value = "pe")]
    Pe,
    #[sea_orm(string_value = "ab")]
    Ab,
    #[sea_orm(string_value = "nu")]
    Nu,
    #[sea_orm(string_value = "sk")]
    Sk,
    #[sea_orm(string_value = "bc")]
    Bc,
    #[sea_orm(string_value = "nl")]
    Nl,
    #[sea_orm(string_value = "mn")]
    Mn,
}

/// Postal address of a business. One business can list several locations;
/// postal code stays free text on purpose.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(skip_serializing)]
    pub business_id: i32,
    pub app_office_number: String,
    pub street_number: i32,
    pub street_type: String,
    pub street_name: String,
    pub direction: String,
    pub city: String,
    pub province: Province,
    pub postal_code: String,
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
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
