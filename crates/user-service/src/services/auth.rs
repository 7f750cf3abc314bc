//! Sign-in: credential check, token issue, session write.
//!
//! A successful sign-in does three things in order: verify the bcrypt hash,
//! issue an HS256 access token, and write the session record to the shared
//! store keyed by the raw token. The other services validate requests purely
//! against that record, so until the write lands the token is useless.
//!
//! Lookup misses and password mismatches both come back as the same
//! `Unauthenticated` message so responses do not reveal which emails have
//! accounts.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use vendly_core::{JwtConfig, ServiceError, SessionRecord, SessionStore};

use crate::db::{RepositoryError, UserStore};
use crate::models::User;

/// The result of a successful sign-in: the account plus its fresh token.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub user: User,
    pub access_token: String,
}

/// Sign-in orchestration.
#[derive(Clone)]
pub struct SignInService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    jwt: JwtConfig,
    session_ttl: Duration,
}

impl SignInService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        jwt: JwtConfig,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            jwt,
            session_ttl,
        }
    }

    /// Verify credentials and establish a session.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` for an unknown or unverified email or a wrong
    /// password; `Internal` for storage, hashing, or token failures.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome, ServiceError> {
        let user = match self.users.find_verified_by_email(email).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => {
                tracing::info!(email, "sign-in rejected: no verified account");
                return Err(invalid_credentials());
            }
            Err(err) => return Err(err.into()),
        };

        let password_matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| ServiceError::Internal(format!("password verification failed: {e}")))?;
        if !password_matches {
            tracing::info!(email, "sign-in rejected: password mismatch");
            return Err(invalid_credentials());
        }

        let access_token = self
            .jwt
            .issue(user.id.as_i64())
            .map_err(|e| ServiceError::Internal(format!("token issue failed: {e}")))?;

        let record = SessionRecord {
            user_id: user.id.as_i64(),
            name: user.name.clone(),
            email: user.email.clone(),
            logged_in: true,
            created_at: Utc::now().to_rfc3339(),
            token: access_token.clone(),
            role_name: user.role.clone(),
            phone: Some(user.phone.clone()),
            address: Some(user.address.clone()),
            lat: user.lat,
            lng: user.lng,
            photo: Some(user.photo.clone()),
        };
        let payload = serde_json::to_string(&record)
            .map_err(|e| ServiceError::Internal(format!("session encode failed: {e}")))?;

        self.sessions
            .put(&access_token, &payload, self.session_ttl)
            .await
            .map_err(|e| ServiceError::Internal(format!("session write failed: {e}")))?;

        tracing::info!(user_id = %user.id, "sign-in succeeded");
        Ok(SignInOutcome { user, access_token })
    }

    /// Drop the caller's session. Subsequent requests with the same token
    /// fail at the auth gate.
    ///
    /// # Errors
    ///
    /// `Internal` if the store delete fails.
    pub async fn sign_out(&self, token: &str) -> Result<(), ServiceError> {
        self.sessions
            .delete(token)
            .await
            .map_err(|e| ServiceError::Internal(format!("session delete failed: {e}")))
    }
}

fn invalid_credentials() -> ServiceError {
    ServiceError::Unauthenticated("email or password is incorrect".to_owned())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use vendly_core::{InMemorySessionStore, Role, UserId};

    use super::*;
    use crate::models::CustomerFilter;

    struct StubUsers {
        user: Option<User>,
    }

    fn verified_user(password: &str) -> User {
        User {
            id: UserId::new(7),
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            password_hash: bcrypt::hash(password, 4).expect("hash"),
            role: Role::Customer,
            phone: "555-0100".to_owned(),
            address: "1 Main St".to_owned(),
            lat: None,
            lng: None,
            photo: String::new(),
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    #[async_trait]
    impl UserStore for StubUsers {
        async fn find_verified_by_email(&self, email: &str) -> Result<User, RepositoryError> {
            self.user
                .clone()
                .filter(|user| user.email == email)
                .ok_or(RepositoryError::NotFound)
        }

        async fn find_by_id(&self, _user_id: UserId) -> Result<User, RepositoryError> {
            self.user.clone().ok_or(RepositoryError::NotFound)
        }

        async fn list_customers(
            &self,
            _filter: &CustomerFilter,
        ) -> Result<(Vec<User>, i64, i64), RepositoryError> {
            Err(RepositoryError::NotFound)
        }
    }

    fn service(user: Option<User>, sessions: Arc<InMemorySessionStore>) -> SignInService {
        SignInService::new(
            Arc::new(StubUsers { user }),
            sessions,
            JwtConfig::new("test-secret".into(), "vendly", 23),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_sign_in_writes_session_keyed_by_token() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let service = service(Some(verified_user("hunter2")), Arc::clone(&sessions));

        let outcome = service
            .sign_in("ann@example.com", "hunter2")
            .await
            .expect("signed in");

        let stored = sessions
            .get(&outcome.access_token)
            .await
            .expect("get")
            .expect("present");
        let record: SessionRecord = serde_json::from_str(&stored).expect("deserialize");
        assert_eq!(record.user_id, 7);
        assert_eq!(record.role_name, Role::Customer);
        assert!(record.logged_in);
        assert_eq!(record.token, outcome.access_token);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthenticated() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let service = service(Some(verified_user("hunter2")), sessions);

        let err = service
            .sign_in("ann@example.com", "letmein")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_unknown_email_gets_same_message_as_wrong_password() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let service = service(None, sessions);

        let err = service
            .sign_in("ghost@example.com", "whatever")
            .await
            .unwrap_err();
        let ServiceError::Unauthenticated(message) = err else {
            panic!("expected Unauthenticated");
        };
        assert_eq!(message, "email or password is incorrect");
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_session() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let service = service(Some(verified_user("hunter2")), Arc::clone(&sessions));

        let outcome = service
            .sign_in("ann@example.com", "hunter2")
            .await
            .expect("signed in");
        service.sign_out(&outcome.access_token).await.expect("signed out");

        assert!(
            sessions
                .get(&outcome.access_token)
                .await
                .expect("get")
                .is_none()
        );
    }
}
