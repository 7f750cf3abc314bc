//! The auth gate.
//!
//! Every protected request passes through [`require_auth`] before any handler
//! logic: the bearer credential is structurally verified, the raw token is
//! looked up in the shared session store, the stored record is deserialized
//! into an [`Identity`], and the route policy is evaluated. On success the
//! identity and the raw token are attached to the request's extensions; on
//! failure the request terminates with the envelope error response.
//!
//! The gate is read-only against the session store. Each service runs its own
//! gate instance against the same store; no service trusts another's
//! validation.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ServiceError;
use crate::policy::{Access, RoutePolicy};
use crate::session::{SessionRecord, SessionStore};
use crate::token::JwtConfig;
use crate::types::{Role, UserId};

/// The identity resolved from the caller's session, attached to the request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<SessionRecord> for Identity {
    fn from(record: SessionRecord) -> Self {
        Self {
            user_id: UserId::new(record.user_id),
            name: record.name,
            email: record.email,
            role: record.role_name,
            phone: record.phone,
            address: record.address,
        }
    }
}

/// The raw bearer token the caller presented, kept for forwarding to peer
/// services (which re-validate it against the same session store).
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Shared state for the auth gate middleware.
#[derive(Clone)]
pub struct AuthState {
    inner: Arc<AuthStateInner>,
}

struct AuthStateInner {
    sessions: Arc<dyn SessionStore>,
    jwt: JwtConfig,
    policy: RoutePolicy,
}

impl AuthState {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionStore>, jwt: JwtConfig, policy: RoutePolicy) -> Self {
        Self {
            inner: Arc::new(AuthStateInner {
                sessions,
                jwt,
                policy,
            }),
        }
    }

    /// Validate a raw `Authorization` header against a request path.
    ///
    /// Single pass, no retries; a rejection is terminal for the request.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` - header missing/malformed, signature invalid, or
    ///   no live session for the token
    /// - `Forbidden` - the role is not permitted for this path
    /// - `Internal` - the session store failed, or the stored payload is
    ///   malformed (writer bug; handled, never a panic)
    pub async fn authorize(
        &self,
        auth_header: Option<&str>,
        path: &str,
    ) -> Result<Identity, ServiceError> {
        let token = auth_header
            .and_then(|header| header.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServiceError::Unauthenticated("missing or invalid token".to_owned()))?;

        // Structural/signature check only; identity comes from the session.
        self.inner.jwt.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "token failed structural validation");
            ServiceError::Unauthenticated("invalid or expired token".to_owned())
        })?;

        // The raw token string, not the decoded claims, keys the session.
        let payload = self
            .inner
            .sessions
            .get(token)
            .await
            .map_err(|e| ServiceError::Internal(format!("session lookup failed: {e}")))?
            .filter(|payload| !payload.is_empty())
            .ok_or_else(|| ServiceError::Unauthenticated("session not found".to_owned()))?;

        let record: SessionRecord = serde_json::from_str(&payload)
            .map_err(|e| ServiceError::Internal(format!("malformed session record: {e}")))?;
        let identity = Identity::from(record);

        match self.inner.policy.evaluate(&identity.role, path) {
            Access::Allow => Ok(identity),
            Access::Deny => Err(ServiceError::Forbidden(
                "customer cannot access admin routes".to_owned(),
            )),
        }
    }
}

/// Auth gate middleware. Wire with
/// `axum::middleware::from_fn_with_state(auth_state, require_auth)`.
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let path = request.uri().path().to_owned();

    match auth.authorize(auth_header.as_deref(), &path).await {
        Ok(identity) => {
            // authorize() only succeeds on a well-formed bearer header
            if let Some(token) = auth_header.as_deref().and_then(|h| h.strip_prefix("Bearer ")) {
                request
                    .extensions_mut()
                    .insert(BearerToken(token.to_owned()));
            }
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

impl<S> axum::extract::FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            ServiceError::Unauthenticated("missing or invalid token".to_owned())
        })
    }
}

impl<S> axum::extract::FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            ServiceError::Unauthenticated("missing or invalid token".to_owned())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::session::InMemorySessionStore;

    fn jwt_config() -> JwtConfig {
        JwtConfig::new(SecretString::from("gate-test-signing-key"), "vendly", 23)
    }

    async fn auth_state_with_session(user_id: i64, name: &str, role: &str) -> (AuthState, String) {
        let jwt = jwt_config();
        let token = jwt.issue(user_id).expect("issue token");

        let record = SessionRecord {
            user_id,
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            logged_in: true,
            created_at: "2026-01-01 00:00:00".to_owned(),
            token: token.clone(),
            role_name: Role::from(role),
            phone: Some("555-0100".to_owned()),
            address: Some("1 Main St".to_owned()),
            lat: None,
            lng: None,
            photo: None,
        };

        let sessions = InMemorySessionStore::new();
        sessions
            .put(
                &token,
                &serde_json::to_string(&record).expect("serialize"),
                Duration::from_secs(60),
            )
            .await
            .expect("put session");

        let state = AuthState::new(Arc::new(sessions), jwt, RoutePolicy::platform_default());
        (state, token)
    }

    #[tokio::test]
    async fn test_valid_token_returns_stored_identity() {
        let (state, token) = auth_state_with_session(7, "Ann", "Admin").await;
        let header = format!("Bearer {token}");

        let identity = state
            .authorize(Some(&header), "/admin/orders")
            .await
            .expect("authorized");
        assert_eq!(identity.user_id, UserId::new(7));
        assert_eq!(identity.name, "Ann");
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthenticated() {
        let (state, _) = auth_state_with_session(7, "Ann", "Admin").await;
        let err = state.authorize(None, "/admin/orders").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_unauthenticated() {
        let (state, token) = auth_state_with_session(7, "Ann", "Admin").await;
        let err = state
            .authorize(Some(&token), "/admin/orders")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_token_without_session_is_unauthenticated() {
        // Structurally valid token, but nothing in the session store:
        // models logout/expiry by deletion.
        let jwt = jwt_config();
        let token = jwt.issue(9).expect("issue");
        let state = AuthState::new(
            Arc::new(InMemorySessionStore::new()),
            jwt,
            RoutePolicy::platform_default(),
        );

        let header = format!("Bearer {token}");
        let err = state.authorize(Some(&header), "/profile").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_forged_token_is_unauthenticated() {
        let (state, _) = auth_state_with_session(7, "Ann", "Admin").await;
        let forged = JwtConfig::new(SecretString::from("wrong-signing-key"), "vendly", 23)
            .issue(7)
            .expect("issue");
        let header = format!("Bearer {forged}");

        let err = state
            .authorize(Some(&header), "/admin/orders")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_customer_forbidden_on_admin_path() {
        let (state, token) = auth_state_with_session(7, "Ann", "Customer").await;
        let header = format!("Bearer {token}");

        let err = state
            .authorize(Some(&header), "/admin/orders")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_customer_allowed_on_non_admin_path() {
        let (state, token) = auth_state_with_session(7, "Ann", "Customer").await;
        let header = format!("Bearer {token}");

        let identity = state
            .authorize(Some(&header), "/profile")
            .await
            .expect("authorized");
        assert_eq!(identity.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_malformed_session_payload_is_internal_error() {
        let jwt = jwt_config();
        let token = jwt.issue(3).expect("issue");

        let sessions = InMemorySessionStore::new();
        sessions
            .put(&token, "{not json", Duration::from_secs(60))
            .await
            .expect("put");
        let state = AuthState::new(Arc::new(sessions), jwt, RoutePolicy::platform_default());

        let header = format!("Bearer {token}");
        let err = state.authorize(Some(&header), "/profile").await.unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn test_empty_session_payload_is_unauthenticated() {
        let jwt = jwt_config();
        let token = jwt.issue(3).expect("issue");

        let sessions = InMemorySessionStore::new();
        sessions
            .put(&token, "", Duration::from_secs(60))
            .await
            .expect("put");
        let state = AuthState::new(Arc::new(sessions), jwt, RoutePolicy::platform_default());

        let header = format!("Bearer {token}");
        let err = state.authorize(Some(&header), "/profile").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }
}
