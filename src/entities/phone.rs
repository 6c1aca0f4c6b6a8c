use std::sync::LazyLock;

use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accepted formats: "+1-514-111-1111", "514-111-1111", "514 111 1111",
/// "111-1111", "111 1111". Extensions are carried separately.
static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+\d{1,2}[\s-])?(\(?\d{3}\)?[\s.-])?\d{3}[\s.-]\d{4}$")
        .expect("phone regex must compile")
});

pub fn is_valid_number(number: &str) -> bool {
    PHONE_NUMBER.is_match(number)
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(25))")]
#[serde(rename_all = "lowercase")]
pub enum PhoneType {
    #[sea_orm(string_value = "tel")]
    Tel,
    #[sea_orm(string_value = "fax")]
    Fax,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(skip_serializing)]
    pub business_id: i32,
    pub number: String,
    pub r#type: PhoneType,
    pub extension: Option<i32>,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_documented_number_formats() {
        for number in [
            "+1-514-111-1111",
            "514-111-1111",
            "+1 514 111 1111",
            "514 111 1111",
            "111-1111",
            "111 1111",
        ] {
            assert!(is_valid_number(number), "expected {number:?} to validate");
        }
    }

    #[test]
    fn rejects_malformed_numbers() {
        for number in ["", "abc", "12345", "514-11-1111", "514-111-1111 x22"] {
            assert!(!is_valid_number(number), "expected {number:?} to fail");
        }
    }
}
