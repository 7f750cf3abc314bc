//! Admin customer directory handlers.
//!
//! The detail endpoint doubles as the buyer-info contract the order service
//! consumes during aggregation, so its field names are load-bearing.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use vendly_core::{Envelope, Identity, Pagination, ServiceError, UserId};

use crate::models::{CustomerFilter, Profile};
use crate::state::AppState;

/// Query parameters for the admin customer list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_type: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl CustomerListQuery {
    fn into_filter(self) -> CustomerFilter {
        CustomerFilter::from_query(
            self.search,
            self.order_by,
            self.order_type,
            self.page,
            self.per_page,
        )
    }
}

/// `GET /admin/customers` - paginated customer listing.
#[instrument(skip(state, identity), fields(caller = %identity.user_id))]
pub async fn get_all_admin(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<Envelope<Vec<Profile>>>, ServiceError> {
    let filter = query.into_filter();

    let (users, total_count, total_pages) = state.users().list_customers(&filter).await?;

    let profiles: Vec<Profile> = users.iter().map(Profile::from).collect();
    Ok(Json(Envelope::ok_paginated(
        "success",
        profiles,
        Pagination {
            page: filter.page,
            total_count,
            per_page: filter.limit,
            total_page: total_pages,
        },
    )))
}

/// `GET /admin/customers/{id}` - single customer, the buyer-info contract.
#[instrument(skip(state, identity), fields(caller = %identity.user_id))]
pub async fn get_by_id_admin(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<Profile>>, ServiceError> {
    let user = state.users().find_by_id(UserId::new(id)).await?;
    Ok(Json(Envelope::ok("success", Profile::from(&user))))
}

#[cfg(test)]
mod tests {
    use vendly_core::SortDirection;

    use super::*;

    #[test]
    fn test_query_uses_camel_case_parameter_names() {
        let query: CustomerListQuery = serde_json::from_str(
            r#"{"search":"ann","orderBy":"name","orderType":"asc","page":2,"perPage":25}"#,
        )
        .expect("deserialize");
        let filter = query.into_filter();
        assert_eq!(filter.search, "ann");
        assert_eq!(filter.order_by, "name");
        assert_eq!(filter.order_type, SortDirection::Asc);
        assert_eq!(filter.page, 2);
        assert_eq!(filter.limit, 25);
    }
}
