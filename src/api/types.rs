//! Response shapes and the list envelope. Nested representations mirror the
//! public JSON contract: a business embeds its category (with recursive
//! children), tags, phones, addresses, social links and opening hours.

use serde::Serialize;

use crate::entities::{address, business, category, opening_hour, phone, social_link, tag, user};
use crate::services::{BusinessDetails, SuggestionDetails};

/// List envelope: `{next, previous, items_count, total_pages, results}`.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub next: Option<String>,
    pub previous: Option<String>,
    pub items_count: u64,
    pub total_pages: u64,
    pub results: Vec<T>,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(
        path: &str,
        page: u64,
        page_size: u64,
        items_count: u64,
        total_pages: u64,
        results: Vec<T>,
    ) -> Self {
        let link = |p: u64| format!("{path}?page={p}&page_size={page_size}");

        Self {
            next: (page < total_pages).then(|| link(page + 1)),
            previous: (page > 1 && page <= total_pages).then(|| link(page - 1)),
            items_count,
            total_pages,
            results,
        }
    }
}

/// A category with its recursive children, as embedded everywhere categories
/// appear. Depth is bounded by the tree's own three-level limit.
#[derive(Debug, Serialize)]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub children: Vec<CategoryNode>,
}

pub fn category_node(all: &[category::Model], id: i32) -> Option<CategoryNode> {
    let model = all.iter().find(|c| c.id == id)?;
    Some(build_node(all, model))
}

pub fn category_forest<'a>(
    all: &[category::Model],
    roots: impl Iterator<Item = &'a category::Model>,
) -> Vec<CategoryNode> {
    roots.map(|root| build_node(all, root)).collect()
}

fn build_node(all: &[category::Model], model: &category::Model) -> CategoryNode {
    CategoryNode {
        id: model.id,
        name: model.name.clone(),
        slug: model.slug.clone(),
        children: all
            .iter()
            .filter(|c| c.parent_id == Some(model.id))
            .map(|child| build_node(all, child))
            .collect(),
    }
}

#[derive(Debug, Serialize)]
pub struct PhonePayload {
    pub id: i32,
    pub number: String,
    pub r#type: phone::PhoneType,
    pub extension: Option<i32>,
}

impl From<phone::Model> for PhonePayload {
    fn from(model: phone::Model) -> Self {
        Self {
            id: model.id,
            number: model.number,
            r#type: model.r#type,
            extension: model.extension,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SocialLinkPayload {
    pub id: i32,
    pub link: String,
    pub r#type: &'static str,
}

impl From<social_link::Model> for SocialLinkPayload {
    fn from(model: social_link::Model) -> Self {
        let r#type = model.link_type();
        Self {
            id: model.id,
            link: model.link,
            r#type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OpeningHourPayload {
    pub id: i32,
    pub day: opening_hour::Weekday,
    pub opening_time: Option<chrono::NaiveTime>,
    pub closing_time: Option<chrono::NaiveTime>,
    pub closed: bool,
}

impl From<opening_hour::Model> for OpeningHourPayload {
    fn from(model: opening_hour::Model) -> Self {
        Self {
            id: model.id,
            day: model.day,
            opening_time: model.opening_time,
            closing_time: model.closing_time,
            closed: model.closed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddressPayload {
    pub id: i32,
    pub app_office_number: String,
    pub street_number: i32,
    pub street_type: String,
    pub street_name: String,
    pub direction: String,
    pub city: String,
    pub province: address::Province,
    pub postal_code: String,
}

impl From<address::Model> for AddressPayload {
    fn from(model: address::Model) -> Self {
        Self {
            id: model.id,
            app_office_number: model.app_office_number,
            street_number: model.street_number,
            street_type: model.street_type,
            street_name: model.street_name,
            direction: model.direction,
            city: model.city,
            province: model.province,
            postal_code: model.postal_code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagPayload {
    pub id: i32,
    pub name: String,
}

impl From<tag::Model> for TagPayload {
    fn from(model: tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BusinessPayload {
    pub id: i32,
    pub category: Option<CategoryNode>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub slogan: String,
    pub website: String,
    pub email: String,
    pub status: business::Status,
    pub tags: Vec<TagPayload>,
    pub phones: Vec<PhonePayload>,
    pub addresses: Vec<AddressPayload>,
    pub social_links: Vec<SocialLinkPayload>,
    pub business_hours: Vec<OpeningHourPayload>,
    pub payment_types: Vec<String>,
    pub deleted_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub accepted_at: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub updated_at: chrono::DateTime<chrono::FixedOffset>,
}

impl BusinessPayload {
    pub fn from_details(details: BusinessDetails, all_categories: &[category::Model]) -> Self {
        let business = details.business;
        Self {
            id: business.id,
            category: details
                .category
                .and_then(|c| category_node(all_categories, c.id)),
            name: business.name,
            slug: business.slug,
            description: business.description,
            slogan: business.slogan,
            website: business.website,
            email: business.email,
            status: business.status,
            tags: details.tags.into_iter().map(TagPayload::from).collect(),
            phones: details.phones.into_iter().map(PhonePayload::from).collect(),
            addresses: details
                .addresses
                .into_iter()
                .map(AddressPayload::from)
                .collect(),
            social_links: details
                .social_links
                .into_iter()
                .map(SocialLinkPayload::from)
                .collect(),
            business_hours: details
                .opening_hours
                .into_iter()
                .map(OpeningHourPayload::from)
                .collect(),
            payment_types: details.payment_types.into_iter().map(|p| p.name).collect(),
            deleted_at: business.deleted_at,
            accepted_at: business.accepted_at,
            created_at: business.created_at,
            updated_at: business.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionBusinessPayload {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub website: String,
    pub email: String,
    pub phones: Vec<PhonePayload>,
    pub category: Option<CategoryNode>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionPayload {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_owner: bool,
    pub business: Option<SuggestionBusinessPayload>,
}

impl SuggestionPayload {
    pub fn from_details(details: SuggestionDetails, all_categories: &[category::Model]) -> Self {
        let business = details.business.map(|business| SuggestionBusinessPayload {
            id: business.id,
            name: business.name,
            description: business.description,
            website: business.website,
            email: business.email,
            phones: details.phones.into_iter().map(PhonePayload::from).collect(),
            category: details
                .category
                .and_then(|c| category_node(all_categories, c.id)),
        });

        Self {
            id: details.suggestion.id,
            name: details.suggestion.name,
            email: details.suggestion.email,
            is_owner: details.suggestion.is_owner,
            business,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<user::Model> for UserPayload {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn envelope_links_first_middle_and_last_pages() {
        let first = Paginated::new("/businesses", 1, 25, 60, 3, vec![1]);
        assert_eq!(first.next.as_deref(), Some("/businesses?page=2&page_size=25"));
        assert_eq!(first.previous, None);

        let middle = Paginated::new("/businesses", 2, 25, 60, 3, vec![1]);
        assert_eq!(middle.next.as_deref(), Some("/businesses?page=3&page_size=25"));
        assert_eq!(middle.previous.as_deref(), Some("/businesses?page=1&page_size=25"));

        let last = Paginated::new("/businesses", 3, 25, 60, 3, vec![1]);
        assert_eq!(last.next, None);
        assert_eq!(last.previous.as_deref(), Some("/businesses?page=2&page_size=25"));
    }

    #[test]
    fn envelope_for_a_single_page_has_no_links() {
        let page = Paginated::new("/businesses", 1, 25, 3, 1, vec![1, 2, 3]);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
        assert_eq!(page.items_count, 3);
        assert_eq!(page.total_pages, 1);
    }

    fn category_model(id: i32, name: &str, parent_id: Option<i32>) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
            slug: crate::text::slugify(name),
            parent_id,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            deleted_at: None,
        }
    }

    #[test]
    fn category_node_nests_children_recursively() {
        let all = vec![
            category_model(1, "Restaurant", None),
            category_model(2, "African", Some(1)),
            category_model(3, "Ethiopian", Some(2)),
        ];

        let node = category_node(&all, 1).unwrap();
        assert_eq!(node.slug, "restaurant");
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].name, "African");
        assert_eq!(node.children[0].children[0].name, "Ethiopian");
    }

    #[test]
    fn unknown_category_id_yields_no_node() {
        assert!(category_node(&[], 42).is_none());
    }
}
