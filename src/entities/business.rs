use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publication status of a directory entry. New submissions start `pending`;
/// moderation moves them to `accepted` or `refused`. Any state is reachable
/// from any other.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(25))")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "refused")]
    Refused,
}

impl Status {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Status::Pending),
            "accepted" => Some(Status::Accepted),
            "refused" => Some(Status::Refused),
            _ => None,
        }
    }
}

/// A directory entry. Soft-deleted: `deleted_at` marks removal instead of
/// dropping the row, so moderation history stays queryable by id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "businesses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub slug: String,
    pub category_id: Option<i32>,
    pub slogan: String,
    pub description: String,
    pub website: String,
    pub email: String,
    pub notes: String,
    pub status: Status,
    pub accepted_at: Option<Date>,
    pub last_updated_by: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LastUpdatedBy",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    LastUpdatedBy,
    #[sea_orm(has_many = "super::phone::Entity")]
    Phones,
    #[sea_orm(has_many = "super::social_link::Entity")]
    SocialLinks,
    #[sea_orm(has_many = "super::opening_hour::Entity")]
    OpeningHours,
    #[sea_orm(has_many = "super::address::Entity")]
    Addresses,
    #[sea_orm(has_many = "super::suggestion::Entity")]
    Suggestions,
    #[sea_orm(has_many = "super::business_tag::Entity")]
    BusinessTags,
    #[sea_orm(has_many = "super::business_payment_type::Entity")]
    BusinessPaymentTypes,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LastUpdatedBy.def()
    }
}

impl Related<super::phone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phones.def()
    }
}

impl Related<super::social_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocialLinks.def()
    }
}

impl Related<super::opening_hour::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpeningHours.def()
    }
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl Related<super::suggestion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suggestions.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::business_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::business_tag::Relation::Business.def().rev())
    }
}

impl Related<super::payment_type::Entity> for Entity {
    fn to() -> RelationDef {
        super::business_payment_type::Relation::PaymentType.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::business_payment_type::Relation::Business.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_relates_to_its_auditing_user() {
        let def = <Entity as Related<crate::entities::user::Entity>>::to();
        assert!(matches!(def.rel_type, sea_orm::RelationType::HasOne));
    }

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!(Status::parse("pending"), Some(Status::Pending));
        assert_eq!(Status::parse("accepted"), Some(Status::Accepted));
        assert_eq!(Status::parse("refused"), Some(Status::Refused));
        assert_eq!(Status::parse("Accepted"), None);
        assert_eq!(Status::parse(""), None);
    }
}
