//! Sign-in and sign-out handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use vendly_core::{BearerToken, Envelope, Role, ServiceError, UserId};

use crate::state::AppState;

/// Sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign-in response payload.
#[derive(Debug, Serialize)]
pub struct SignInData {
    pub access_token: String,
    pub role: Role,
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// `POST /auth/signin`
#[instrument(skip_all, fields(email = %request.email))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<Envelope<SignInData>>, ServiceError> {
    let outcome = state
        .sign_in_service()
        .sign_in(&request.email, &request.password)
        .await?;

    let user = outcome.user;
    Ok(Json(Envelope::ok(
        "success",
        SignInData {
            access_token: outcome.access_token,
            role: user.role,
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            lat: user.lat,
            lng: user.lng,
        },
    )))
}

/// `POST /auth/signout` - drop the caller's session.
#[instrument(skip_all)]
pub async fn sign_out(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Envelope<()>>, ServiceError> {
    state.sign_in_service().sign_out(token.as_str()).await?;
    Ok(Json(Envelope::ok("success", ())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_request_decodes() {
        let request: SignInRequest =
            serde_json::from_str(r#"{"email":"ann@example.com","password":"hunter2"}"#)
                .expect("deserialize");
        assert_eq!(request.email, "ann@example.com");
    }

    #[test]
    fn test_sign_in_data_shape() {
        let json = serde_json::to_value(SignInData {
            access_token: "tok".to_owned(),
            role: Role::Customer,
            id: UserId::new(7),
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            phone: String::new(),
            lat: None,
            lng: None,
        })
        .expect("serialize");
        assert_eq!(json["access_token"], "tok");
        assert_eq!(json["role"], "Customer");
        assert_eq!(json["id"], 7);
    }
}
