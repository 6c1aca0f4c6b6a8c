use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Known providers, checked in order; the first keyword found in the URL wins.
const PROVIDERS: [&str; 4] = ["linkedin", "facebook", "instagram", "twitter"];

/// Classify a social link URL by provider keyword, defaulting to "unknown".
pub fn link_type(link: &str) -> &'static str {
    let link = link.to_lowercase();
    PROVIDERS
        .iter()
        .find(|provider| link.contains(**provider))
        .copied()
        .unwrap_or("unknown")
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "social_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(skip_serializing)]
    pub business_id: i32,
    pub link: String,
}

impl Model {
    pub fn link_type(&self) -> &'static str {
        link_type(&self.link)
    }
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
    fn classifies_by_first_matching_provider() {
        assert_eq!(link_type("www.facebook.com/moi"), "facebook");
        assert_eq!(link_type("https://www.LinkedIn.com/in/someone"), "linkedin");
        assert_eq!(link_type("https://instagram.com/resto"), "instagram");
    }

    #[test]
    fn unrecognized_links_are_unknown() {
        assert_eq!(link_type("https://example.com/profile"), "unknown");
        assert_eq!(link_type(""), "unknown");
    }
}
