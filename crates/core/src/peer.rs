//! Outbound HTTP client for peer service calls.
//!
//! Every call forwards the *original caller's* bearer token; the peer runs
//! its own auth gate against the shared session store. One timeout bounds
//! connect and read, there is no automatic retry (retry policy belongs to
//! the caller), and bodies are decoded into typed structs so a shape
//! mismatch surfaces as [`PeerError::Decode`] at the call site.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::ServiceError;

/// Failure modes of a single peer call.
#[derive(Debug, Error)]
pub enum PeerError {
    /// Network-level failure (DNS, connect, TLS, reset).
    #[error("peer request failed: {0}")]
    Transport(String),

    /// The call exceeded its deadline. Not retried here.
    #[error("peer call timed out")]
    Timeout,

    /// The peer answered with a non-success status.
    #[error("peer returned status {0}")]
    Status(u16),

    /// The body was not the expected JSON shape.
    #[error("failed to decode peer response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PeerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<PeerError> for ServiceError {
    fn from(err: PeerError) -> Self {
        match err {
            PeerError::Timeout => Self::Timeout("peer call timed out".to_owned()),
            PeerError::Decode(msg) => Self::Decode(msg),
            PeerError::Transport(msg) => Self::Upstream(msg),
            PeerError::Status(code) => Self::Upstream(format!("peer returned status {code}")),
        }
    }
}

/// Peer responses arrive in the platform envelope; only `data` matters here.
#[derive(Debug, Deserialize)]
struct PeerEnvelope<T> {
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Reusable outbound HTTP client.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections, and
/// reqwest releases each response's connection on every exit path, so
/// repeated calls in a fan-out loop do not leak resources.
#[derive(Clone)]
pub struct PeerClient {
    inner: Arc<PeerClientInner>,
}

struct PeerClientInner {
    client: reqwest::Client,
}

impl PeerClient {
    /// Build a client with a single timeout bounding connect+read.
    ///
    /// # Errors
    ///
    /// Returns `PeerError::Transport` if the TLS backend cannot initialize.
    pub fn new(timeout: Duration) -> Result<Self, PeerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PeerError::Transport(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(PeerClientInner { client }),
        })
    }

    /// GET a JSON object from a peer, forwarding the caller's bearer token.
    ///
    /// # Errors
    ///
    /// See [`PeerError`] for the failure taxonomy.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> Result<T, PeerError> {
        tracing::debug!(%url, "peer call");

        let response = self
            .inner
            .client
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {bearer_token}"))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::Status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }

    /// GET an envelope-wrapped JSON object and unwrap its `data` field.
    ///
    /// # Errors
    ///
    /// `PeerError::Decode` if the envelope carries no data, plus everything
    /// [`Self::get_json`] can fail with.
    pub async fn get_enveloped<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> Result<T, PeerError> {
        let envelope: PeerEnvelope<T> = self.get_json(url, bearer_token).await?;
        envelope.data.ok_or_else(|| {
            PeerError::Decode(format!(
                "peer response carried no data: {}",
                envelope.message
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    #[test]
    fn test_peer_error_maps_to_service_error() {
        assert!(matches!(
            ServiceError::from(PeerError::Timeout),
            ServiceError::Timeout(_)
        ));
        assert!(matches!(
            ServiceError::from(PeerError::Status(502)),
            ServiceError::Upstream(_)
        ));
        assert!(matches!(
            ServiceError::from(PeerError::Decode("bad".into())),
            ServiceError::Decode(_)
        ));
        assert!(matches!(
            ServiceError::from(PeerError::Transport("reset".into())),
            ServiceError::Upstream(_)
        ));
    }

    #[test]
    fn test_envelope_data_unwrap() {
        let envelope: PeerEnvelope<Payload> =
            serde_json::from_str(r#"{"message":"success","data":{"name":"Ann"}}"#)
                .expect("deserialize");
        assert_eq!(
            envelope.data,
            Some(Payload {
                name: "Ann".to_owned()
            })
        );
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: PeerEnvelope<Payload> =
            serde_json::from_str(r#"{"message":"not found","data":null}"#).expect("deserialize");
        assert!(envelope.data.is_none());
    }
}
