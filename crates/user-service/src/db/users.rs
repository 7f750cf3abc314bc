//! User lookups and the customer directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use vendly_core::{Role, UserId};

use crate::db::RepositoryError;
use crate::models::{CustomerFilter, User};

/// Every column select goes through the same join so the role name is always
/// present on the loaded row.
const SELECT_USER: &str = "SELECT u.id, u.name, u.email, u.password_hash, r.name AS role_name, \
     u.phone, u.address, u.lat, u.lng, u.photo, u.is_verified, u.created_at \
     FROM users u \
     JOIN user_roles ur ON ur.user_id = u.id \
     JOIN roles r ON r.id = ur.role_id";

/// Storage seam for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a verified account by email. Unverified accounts are invisible
    /// to sign-in.
    async fn find_verified_by_email(&self, email: &str) -> Result<User, RepositoryError>;

    /// Look up any account by id.
    async fn find_by_id(&self, user_id: UserId) -> Result<User, RepositoryError>;

    /// Paginated listing of customer-role accounts.
    ///
    /// Returns `(users, total_count, total_pages)`.
    async fn list_customers(
        &self,
        filter: &CustomerFilter,
    ) -> Result<(Vec<User>, i64, i64), RepositoryError>;
}

/// `PostgreSQL` implementation of [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_verified_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{SELECT_USER} WHERE u.email = $1 AND u.is_verified"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(UserRow::into_user).ok_or(RepositoryError::NotFound)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<User, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE u.id = $1"))
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).ok_or(RepositoryError::NotFound)
    }

    async fn list_customers(
        &self,
        filter: &CustomerFilter,
    ) -> Result<(Vec<User>, i64, i64), RepositoryError> {
        // Count first, against the same predicate as the page fetch.
        let mut count_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM users u \
             JOIN user_roles ur ON ur.user_id = u.id \
             JOIN roles r ON r.id = ur.role_id",
        );
        push_predicate(&mut count_query, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let total_pages = (total_count as u64).div_ceil(filter.limit as u64) as i64;

        let mut page_query = QueryBuilder::<Postgres>::new(SELECT_USER);
        push_predicate(&mut page_query, filter);
        // order_by is validated against a column whitelist at parse time
        page_query.push(format!(
            " ORDER BY u.{} {}",
            filter.order_by,
            filter.order_type.as_sql()
        ));
        page_query.push(" LIMIT ");
        page_query.push_bind(filter.limit);
        page_query.push(" OFFSET ");
        page_query.push_bind(filter.offset());

        let rows: Vec<UserRow> = page_query.build_query_as().fetch_all(&self.pool).await?;
        if rows.is_empty() {
            tracing::info!(search = %filter.search, page = filter.page, "no customers matched filter");
            return Err(RepositoryError::NotFound);
        }

        let users = rows.into_iter().map(UserRow::into_user).collect();
        Ok((users, total_count, total_pages))
    }
}

/// Shared filter predicate for the count and page queries. Only
/// customer-role accounts appear in the directory.
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, filter: &CustomerFilter) {
    let pattern = format!("%{}%", filter.search);
    builder.push(" WHERE r.name = 'Customer' AND (u.name ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR u.email ILIKE ");
    builder.push_bind(pattern);
    builder.push(")");
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role_name: String,
    phone: String,
    address: String,
    lat: Option<f64>,
    lng: Option<f64>,
    photo: String,
    is_verified: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: Role::from(self.role_name.as_str()),
            phone: self.phone,
            address: self.address,
            lat: self.lat,
            lng: self.lng,
            photo: self.photo,
            is_verified: self.is_verified,
            created_at: self.created_at,
        }
    }
}
