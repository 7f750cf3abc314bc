//! Category domain model.
//!
//! Categories are read-only here; they are authored elsewhere and this
//! service only lists them for the back office. Products reference a
//! category by slug, so the per-category product count is computed at
//! query time rather than stored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vendly_core::{CategoryId, SortDirection};

/// A catalog category. `total_product` counts the products whose
/// `category_slug` matches this category's slug.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub parent_id: Option<CategoryId>,
    pub name: String,
    pub icon: String,
    pub slug: String,
    pub description: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub total_product: i64,
}

impl Category {
    /// The status label shown in admin views.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.published {
            "Published"
        } else {
            "Unpublished"
        }
    }
}

/// Row shape for the admin category list.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListRow {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub slug: String,
    pub status: String,
    pub total_product: i64,
}

impl From<&Category> for CategoryListRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            icon: category.icon.clone(),
            slug: category.slug.clone(),
            status: category.status_label().to_owned(),
            total_product: category.total_product,
        }
    }
}

/// Full category view for the detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetail {
    pub id: CategoryId,
    pub parent_id: Option<CategoryId>,
    pub name: String,
    pub icon: String,
    pub slug: String,
    pub status: String,
    pub description: String,
    pub total_product: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryDetail {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            parent_id: category.parent_id,
            name: category.name.clone(),
            icon: category.icon.clone(),
            slug: category.slug.clone(),
            status: category.status_label().to_owned(),
            description: category.description.clone(),
            total_product: category.total_product,
            created_at: category.created_at,
        }
    }
}

/// Columns the category list may sort by. Anything else falls back to
/// `created_at`, so the column name can be spliced into SQL safely.
const SORTABLE_COLUMNS: &[&str] = &["created_at", "name", "slug"];

/// Normalized filter for the category list query.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    pub search: String,
    pub order_by: String,
    pub order_type: SortDirection,
    pub page: i64,
    pub limit: i64,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            order_by: "created_at".to_owned(),
            order_type: SortDirection::Desc,
            page: 1,
            limit: 10,
        }
    }
}

impl CategoryFilter {
    /// Build a filter from raw query-string values, applying the platform
    /// defaults: page 1, limit 10, `created_at` descending.
    #[must_use]
    pub fn from_query(
        search: Option<String>,
        order_by: Option<String>,
        order_type: Option<String>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Self {
        let order_by = order_by
            .filter(|column| SORTABLE_COLUMNS.contains(&column.as_str()))
            .unwrap_or_else(|| "created_at".to_owned());

        Self {
            search: search.unwrap_or_default(),
            order_by,
            order_type: SortDirection::parse(order_type.as_deref()),
            page: page.filter(|&p| p > 0).unwrap_or(1),
            limit: limit.filter(|&l| l > 0).unwrap_or(10),
        }
    }

    /// Row offset for the page-limited fetch.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category {
            id: CategoryId::new(4),
            parent_id: None,
            name: "Fruit".to_owned(),
            icon: "fruit.svg".to_owned(),
            slug: "fruit".to_owned(),
            description: "Fresh fruit".to_owned(),
            published: true,
            created_at: Utc::now(),
            total_product: 12,
        }
    }

    #[test]
    fn test_filter_defaults() {
        let filter = CategoryFilter::from_query(None, None, None, None, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.order_by, "created_at");
        assert_eq!(filter.order_type, SortDirection::Desc);
    }

    #[test]
    fn test_unknown_sort_column_falls_back() {
        let filter = CategoryFilter::from_query(
            None,
            Some("icon; DROP TABLE categories".to_owned()),
            Some("asc".to_owned()),
            Some(-2),
            Some(0),
        );
        assert_eq!(filter.order_by, "created_at");
        assert_eq!(filter.order_type, SortDirection::Asc);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
    }

    #[test]
    fn test_status_label_maps_published_flag() {
        let mut cat = category();
        assert_eq!(cat.status_label(), "Published");
        cat.published = false;
        assert_eq!(cat.status_label(), "Unpublished");
    }

    #[test]
    fn test_list_row_carries_product_count() {
        let json = serde_json::to_value(CategoryListRow::from(&category())).expect("serialize");
        assert_eq!(json["slug"], "fruit");
        assert_eq!(json["status"], "Published");
        assert_eq!(json["total_product"], 12);
        assert!(json.get("description").is_none());
    }
}
