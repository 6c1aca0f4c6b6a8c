use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{business, prelude::*};
use crate::error::ApiError;
use crate::text::normalized_levenshtein;

pub const DEFAULT_MAX_DISTANCE: f64 = 0.35;
pub const DEFAULT_LIMIT: usize = 10;

/// One searchable business: its name plus the names of its tags.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub tags: Vec<String>,
}

/// Fuzzy + substring autocomplete over business and tag names.
///
/// Two passes are merged: names whose normalized edit distance to the
/// lowercased query falls strictly below `max_distance`, and business names
/// where the query appears as a case-sensitive substring of the name or of a
/// tag. The result is a deduplicated set truncated to `limit`; no ranking is
/// implied. Linear in candidates times tags, which is fine at directory scale.
pub fn autocomplete_names(
    candidates: &[Candidate],
    query: &str,
    max_distance: f64,
    limit: usize,
) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut names = BTreeSet::new();

    for candidate in candidates {
        if normalized_levenshtein(&lowered, &candidate.name.to_lowercase()) < max_distance {
            names.insert(candidate.name.clone());
        }

        for tag in &candidate.tags {
            if normalized_levenshtein(&lowered, &tag.to_lowercase()) < max_distance {
                names.insert(tag.clone());
            }
        }

        if candidate.name.contains(query) || candidate.tags.iter().any(|t| t.contains(query)) {
            names.insert(candidate.name.clone());
        }
    }

    names.into_iter().take(limit).collect()
}

#[derive(Clone)]
pub struct SearchService {
    db: Arc<DatabaseConnection>,
}

impl SearchService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Suggest names for a partial query. The candidate pool is the public
    /// view: accepted, non-deleted businesses.
    pub async fn autocomplete(
        &self,
        query: &str,
        max_distance: f64,
        limit: usize,
    ) -> Result<Vec<String>, ApiError> {
        let candidates = self.load_candidates().await?;
        Ok(autocomplete_names(&candidates, query, max_distance, limit))
    }

    async fn load_candidates(&self) -> Result<Vec<Candidate>, ApiError> {
        let businesses = Business::find()
            .filter(business::Column::Status.eq(business::Status::Accepted))
            .filter(business::Column::DeletedAt.is_null())
            .all(&*self.db)
            .await?;

        let tag_names: HashMap<i32, String> = Tag::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|tag| (tag.id, tag.name))
            .collect();

        let links = BusinessTag::find().all(&*self.db).await?;
        let mut tags_by_business: HashMap<i32, Vec<String>> = HashMap::new();
        for link in links {
            if let Some(name) = tag_names.get(&link.tag_id) {
                tags_by_business
                    .entry(link.business_id)
                    .or_default()
                    .push(name.clone());
            }
        }

        Ok(businesses
            .into_iter()
            .map(|b| Candidate {
                tags: tags_by_business.remove(&b.id).unwrap_or_default(),
                name: b.name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, tags: &[&str]) -> Candidate {
        Candidate {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn substring_match_includes_only_the_containing_name() {
        let candidates = vec![
            candidate("gracia afrika", &["africain"]),
            candidate("restaurant2", &["tag2"]),
        ];

        let names = autocomplete_names(&candidates, "re", DEFAULT_MAX_DISTANCE, DEFAULT_LIMIT);
        assert!(names.contains(&"restaurant2".to_string()));
        assert!(!names.contains(&"gracia afrika".to_string()));
    }

    #[test]
    fn close_names_match_through_edit_distance() {
        let candidates = vec![candidate("restaurant2", &[])];

        let names = autocomplete_names(&candidates, "restaurant", 0.35, 10);
        assert_eq!(names, vec!["restaurant2".to_string()]);
    }

    #[test]
    fn tag_names_are_fuzzy_candidates_too() {
        let candidates = vec![candidate("gracia afrika", &["africain"])];

        let names = autocomplete_names(&candidates, "africains", 0.35, 10);
        assert!(names.contains(&"africain".to_string()));
    }

    #[test]
    fn substring_match_is_case_sensitive() {
        let candidates = vec![candidate("Restaurant", &[])];

        // "rest" is not a substring of "Restaurant" and the edit distance is
        // too large for the default threshold.
        let names = autocomplete_names(&candidates, "rest", DEFAULT_MAX_DISTANCE, 10);
        assert!(names.is_empty());
    }

    #[test]
    fn results_are_deduplicated_and_truncated() {
        let candidates: Vec<Candidate> = (0..20)
            .map(|i| candidate(&format!("resto {i}"), &[]))
            .collect();

        let names = autocomplete_names(&candidates, "resto", 0.9, 5);
        assert_eq!(names.len(), 5);

        // Same name matched by both passes appears once.
        let twice = vec![candidate("resto", &["resto"])];
        assert_eq!(autocomplete_names(&twice, "resto", 0.35, 10).len(), 1);
    }
}
