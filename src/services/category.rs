use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{category, prelude::*};
use crate::error::ApiError;
use crate::text::slugify;

/// Maximum length of a parent chain, counting the node itself.
pub const MAX_DEPTH: usize = 3;

/// Flat view of the tree: node id to parent id. Traversal always goes through
/// this arena rather than loaded object graphs, so depth and descendant
/// computations are pure functions over ids and cannot loop on bad data.
pub type ParentArena = HashMap<i32, Option<i32>>;

/// Number of nodes on the chain from `id` up to the root, including `id`.
/// Walks are bounded by the arena size, so a corrupted cyclic chain
/// terminates instead of spinning.
pub fn chain_depth(arena: &ParentArena, id: i32) -> usize {
    let mut depth = 0;
    let mut current = Some(id);

    for _ in 0..=arena.len() {
        match current {
            Some(node) => {
                depth += 1;
                current = arena.get(&node).copied().flatten();
            }
            None => break,
        }
    }

    depth
}

/// Rejects a placement whose resulting chain would exceed [`MAX_DEPTH`].
/// The error is field-level on `parent`, matching the submission form.
pub fn validate_depth(arena: &ParentArena, parent_id: Option<i32>) -> Result<(), ApiError> {
    let depth = match parent_id {
        Some(parent) => 1 + chain_depth(arena, parent),
        None => 1,
    };

    if depth > MAX_DEPTH {
        return Err(ApiError::validation(
            "parent",
            format!("category depth may not exceed {MAX_DEPTH} levels"),
        ));
    }

    Ok(())
}

/// Closed descendant set: `id` itself plus every category reachable through
/// child edges. Used to widen "businesses under category X" to the subtree.
pub fn descendant_ids(arena: &ParentArena, id: i32) -> Vec<i32> {
    let mut children: HashMap<i32, Vec<i32>> = HashMap::new();
    for (&node, &parent) in arena {
        if let Some(parent) = parent {
            children.entry(parent).or_default().push(node);
        }
    }

    let mut ids = vec![id];
    let mut cursor = 0;
    while cursor < ids.len() {
        if let Some(kids) = children.get(&ids[cursor]) {
            for &kid in kids {
                if !ids.contains(&kid) {
                    ids.push(kid);
                }
            }
        }
        cursor += 1;
    }

    ids.sort_unstable();
    ids
}

/// Names from `id` up to the root, self first.
pub fn tree_names(arena: &ParentArena, names: &HashMap<i32, String>, id: i32) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = Some(id);

    for _ in 0..=arena.len() {
        match current {
            Some(node) => {
                if let Some(name) = names.get(&node) {
                    path.push(name.clone());
                }
                current = arena.get(&node).copied().flatten();
            }
            None => break,
        }
    }

    path
}

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn all(&self) -> Result<Vec<category::Model>, ApiError> {
        let categories = Category::find()
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(categories)
    }

    pub async fn list(&self, only_root: bool) -> Result<Vec<category::Model>, ApiError> {
        let mut query = Category::find().order_by_asc(category::Column::Id);
        if only_root {
            query = query.filter(category::Column::ParentId.is_null());
        }
        Ok(query.all(&*self.db).await?)
    }

    /// Resolve `{key}` as a numeric id first, then as a slug.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<category::Model>, ApiError> {
        if let Ok(id) = key.parse::<i32>() {
            return Ok(Category::find_by_id(id).one(&*self.db).await?);
        }

        let category = Category::find()
            .filter(category::Column::Slug.eq(key))
            .one(&*self.db)
            .await?;
        Ok(category)
    }

    pub async fn create(
        &self,
        name: &str,
        parent_id: Option<i32>,
    ) -> Result<category::Model, ApiError> {
        let arena = self.parent_arena().await?;
        self.check_parent(&arena, parent_id, None)?;

        let new_category = category::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slugify(name)),
            parent_id: Set(parent_id),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        Ok(new_category.insert(&*self.db).await?)
    }

    /// Update name and/or placement. The slug is always recomputed from the
    /// name current at save time, so a rename refreshes it.
    pub async fn update(
        &self,
        id: i32,
        name: Option<String>,
        parent_id: Option<Option<i32>>,
    ) -> Result<category::Model, ApiError> {
        let category = Category::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or(ApiError::NotFound("category"))?;

        if let Some(new_parent) = parent_id {
            let arena = self.parent_arena().await?;
            self.check_parent(&arena, new_parent, Some(id))?;
        }

        let mut active: category::ActiveModel = category.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(new_parent) = parent_id {
            active.parent_id = Set(new_parent);
        }
        active.slug = Set(slugify(active.name.as_ref()));
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&*self.db).await?)
    }

    /// Hard delete. Children reparent to root and businesses lose their
    /// category through the SET NULL foreign keys.
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let result = Category::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound("category"));
        }
        Ok(())
    }

    /// Self id plus recursively every descendant id.
    pub async fn get_children_ids(&self, id: i32) -> Result<Vec<i32>, ApiError> {
        let arena = self.parent_arena().await?;
        if !arena.contains_key(&id) {
            return Err(ApiError::NotFound("category"));
        }
        Ok(descendant_ids(&arena, id))
    }

    /// Ordered names from the category up to its root.
    pub async fn get_tree(&self, id: i32) -> Result<Vec<String>, ApiError> {
        let categories = self.all().await?;
        if !categories.iter().any(|c| c.id == id) {
            return Err(ApiError::NotFound("category"));
        }

        let arena: ParentArena = categories.iter().map(|c| (c.id, c.parent_id)).collect();
        let names: HashMap<i32, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();

        Ok(tree_names(&arena, &names, id))
    }

    /// Subtree filter support: the descendant set of the category carrying
    /// this slug, or None when no category matches.
    pub async fn subtree_ids_by_slug(&self, slug: &str) -> Result<Option<Vec<i32>>, ApiError> {
        let arena = self.parent_arena().await?;
        let category = Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?;

        Ok(category.map(|c| descendant_ids(&arena, c.id)))
    }

    fn check_parent(
        &self,
        arena: &ParentArena,
        parent_id: Option<i32>,
        moving_id: Option<i32>,
    ) -> Result<(), ApiError> {
        if let Some(parent) = parent_id {
            if !arena.contains_key(&parent) {
                return Err(ApiError::validation("parent", "unknown parent category"));
            }
            if let Some(id) = moving_id {
                if descendant_ids(arena, id).contains(&parent) {
                    return Err(ApiError::validation(
                        "parent",
                        "category cannot be moved under its own subtree",
                    ));
                }
            }
        }

        validate_depth(arena, parent_id)
    }

    async fn parent_arena(&self) -> Result<ParentArena, ApiError> {
        let categories = Category::find().all(&*self.db).await?;
        Ok(categories.into_iter().map(|c| (c.id, c.parent_id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn arena(edges: &[(i32, Option<i32>)]) -> ParentArena {
        edges.iter().copied().collect()
    }

    #[test]
    fn depth_counts_self_and_ancestors() {
        let arena = arena(&[(1, None), (2, Some(1)), (3, Some(2))]);
        assert_eq!(chain_depth(&arena, 1), 1);
        assert_eq!(chain_depth(&arena, 2), 2);
        assert_eq!(chain_depth(&arena, 3), 3);
    }

    #[test]
    fn placement_at_three_levels_is_allowed() {
        let arena = arena(&[(1, None), (2, Some(1))]);
        assert!(validate_depth(&arena, Some(2)).is_ok());
    }

    #[test]
    fn placement_at_four_levels_is_rejected_on_the_parent_field() {
        let arena = arena(&[(1, None), (2, Some(1)), (3, Some(2))]);
        match validate_depth(&arena, Some(3)) {
            Err(ApiError::Validation { field, .. }) => assert_eq!(field, "parent"),
            other => panic!("expected a parent validation error, got {other:?}"),
        }
    }

    #[test]
    fn root_placement_is_always_fine() {
        assert!(validate_depth(&ParentArena::new(), None).is_ok());
    }

    #[test]
    fn cyclic_arena_does_not_hang() {
        // Cannot be created through the service, but traversal must stay bounded.
        let arena = arena(&[(1, Some(2)), (2, Some(1))]);
        assert!(chain_depth(&arena, 1) <= arena.len() + 1);
    }

    #[test]
    fn descendants_form_the_closed_set() {
        let arena = arena(&[
            (1, None),
            (2, Some(1)),
            (3, Some(1)),
            (4, Some(2)),
            (5, None),
        ]);
        assert_eq!(descendant_ids(&arena, 1), vec![1, 2, 3, 4]);
        assert_eq!(descendant_ids(&arena, 2), vec![2, 4]);
        assert_eq!(descendant_ids(&arena, 5), vec![5]);
    }

    fn category_row(id: i32, name: &str, parent_id: Option<i32>) -> category::Model {
        let now = Utc::now();
        category::Model {
            id,
            name: name.to_string(),
            slug: slugify(name),
            parent_id,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn tree_walks_persisted_categories_to_the_root() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                category_row(1, "Restaurant", None),
                category_row(2, "African", Some(1)),
            ]])
            .into_connection();

        let names = CategoryService::new(Arc::new(db)).get_tree(2).await.unwrap();
        assert_eq!(names, vec!["African", "Restaurant"]);
    }

    #[tokio::test]
    async fn children_ids_cover_the_persisted_subtree() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                category_row(1, "Restaurant", None),
                category_row(2, "African", Some(1)),
                category_row(3, "Ethiopian", Some(2)),
                category_row(4, "Bakery", None),
            ]])
            .into_connection();

        let ids = CategoryService::new(Arc::new(db)).get_children_ids(1).await.unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn unknown_category_tree_is_not_found() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();

        let err = CategoryService::new(Arc::new(db)).get_tree(9).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound("category")));
    }

    #[test]
    fn tree_lists_names_from_self_to_root() {
        let arena = arena(&[(1, None), (2, Some(1)), (3, Some(2))]);
        let names: HashMap<i32, String> = [
            (1, "Restaurant".to_string()),
            (2, "African".to_string()),
            (3, "Ethiopian".to_string()),
        ]
        .into();

        assert_eq!(
            tree_names(&arena, &names, 3),
            vec!["Ethiopian", "African", "Restaurant"]
        );
        assert_eq!(tree_names(&arena, &names, 1), vec!["Restaurant"]);
    }
}
