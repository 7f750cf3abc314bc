//! Admin category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use vendly_core::{CategoryId, Envelope, Identity, Pagination, ServiceError};

use crate::models::{CategoryDetail, CategoryFilter, CategoryListRow};
use crate::state::AppState;

/// Query parameters for the admin category list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListQuery {
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_type: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl CategoryListQuery {
    fn into_filter(self) -> CategoryFilter {
        CategoryFilter::from_query(
            self.search,
            self.order_by,
            self.order_type,
            self.page,
            self.per_page,
        )
    }
}

/// `GET /admin/categories` - paginated category listing.
#[instrument(skip(state, identity), fields(caller = %identity.user_id))]
pub async fn get_all_admin(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Envelope<Vec<CategoryListRow>>>, ServiceError> {
    let filter = query.into_filter();

    let (categories, total_count, total_pages) = state.categories().get_all(&filter).await?;

    let rows: Vec<CategoryListRow> = categories.iter().map(CategoryListRow::from).collect();
    Ok(Json(Envelope::ok_paginated(
        "success",
        rows,
        Pagination {
            page: filter.page,
            total_count,
            per_page: filter.limit,
            total_page: total_pages,
        },
    )))
}

/// `GET /admin/categories/{id}` - single category by ID.
#[instrument(skip(state, identity), fields(caller = %identity.user_id))]
pub async fn get_by_id_admin(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<CategoryDetail>>, ServiceError> {
    let category = state.categories().get_by_id(CategoryId::new(id)).await?;
    Ok(Json(Envelope::ok("success", CategoryDetail::from(&category))))
}

/// `GET /admin/categories/slug/{slug}` - single category by slug. Products
/// reference categories by slug, so admin tooling resolves them this way.
#[instrument(skip(state, identity), fields(caller = %identity.user_id))]
pub async fn get_by_slug_admin(
    State(state): State<AppState>,
    identity: Identity,
    Path(slug): Path<String>,
) -> Result<Json<Envelope<CategoryDetail>>, ServiceError> {
    let category = state.categories().get_by_slug(&slug).await?;
    Ok(Json(Envelope::ok("success", CategoryDetail::from(&category))))
}

#[cfg(test)]
mod tests {
    use super::*;

    use vendly_core::SortDirection;

    #[test]
    fn test_query_uses_camel_case_parameter_names() {
        let query: CategoryListQuery = serde_json::from_str(
            r#"{"search":"fruit","orderBy":"name","orderType":"asc","page":2,"perPage":5}"#,
        )
        .expect("deserialize");
        let filter = query.into_filter();
        assert_eq!(filter.search, "fruit");
        assert_eq!(filter.order_by, "name");
        assert_eq!(filter.order_type, SortDirection::Asc);
        assert_eq!(filter.page, 2);
        assert_eq!(filter.limit, 5);
    }

    #[test]
    fn test_empty_query_applies_defaults() {
        let query: CategoryListQuery = serde_json::from_str("{}").expect("deserialize");
        let filter = query.into_filter();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.order_by, "created_at");
    }
}
