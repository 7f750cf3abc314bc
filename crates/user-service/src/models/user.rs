//! User domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vendly_core::{Role, SortDirection, UserId};

/// A user account as stored locally.
///
/// `password_hash` never leaves this crate; response types are built
/// field-by-field in the route layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub photo: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Public profile shape, also the buyer-info contract the order service
/// consumes for aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub photo: String,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            lat: user.lat,
            lng: user.lng,
            photo: user.photo.clone(),
        }
    }
}

/// Columns the customer list may sort by. Anything else falls back to
/// `created_at`, so the column name can be spliced into SQL safely.
const SORTABLE_COLUMNS: &[&str] = &["created_at", "name", "email"];

/// Normalized filter for the customer list query.
#[derive(Debug, Clone)]
pub struct CustomerFilter {
    pub search: String,
    pub order_by: String,
    pub order_type: SortDirection,
    pub page: i64,
    pub limit: i64,
}

impl Default for CustomerFilter {
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

impl CustomerFilter {
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

    #[test]
    fn test_filter_defaults() {
        let filter = CustomerFilter::from_query(None, None, None, None, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.order_by, "created_at");
        assert_eq!(filter.order_type, SortDirection::Desc);
    }

    #[test]
    fn test_unknown_sort_column_falls_back() {
        let filter = CustomerFilter::from_query(
            None,
            Some("password_hash".to_owned()),
            Some("asc".to_owned()),
            Some(2),
            Some(25),
        );
        assert_eq!(filter.order_by, "created_at");
        assert_eq!(filter.order_type, SortDirection::Asc);
        assert_eq!(filter.offset(), 25);
    }

    #[test]
    fn test_profile_omits_password_hash() {
        let user = User {
            id: UserId::new(7),
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            password_hash: "$2b$12$secret".to_owned(),
            role: Role::Customer,
            phone: "555-0100".to_owned(),
            address: "1 Main St".to_owned(),
            lat: Some(-6.2),
            lng: Some(106.8),
            photo: "ann.png".to_owned(),
            is_verified: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(Profile::from(&user)).expect("serialize");
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["role"], "Customer");
        assert!(json.get("password_hash").is_none());
    }
}
