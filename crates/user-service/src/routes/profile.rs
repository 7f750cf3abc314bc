//! Caller profile handler.

use axum::{Json, extract::State};
use tracing::instrument;

use vendly_core::{Envelope, Identity, ServiceError};

use crate::models::Profile;
use crate::state::AppState;

/// `GET /profile` - the caller's own profile.
///
/// The session record carries enough for the gate, but the profile view
/// also needs `lat`, `lng`, and `photo`, so the account is re-read from
/// storage rather than echoed from [`Identity`].
#[instrument(skip(state, identity), fields(caller = %identity.user_id))]
pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Envelope<Profile>>, ServiceError> {
    let user = state.users().find_by_id(identity.user_id).await?;
    Ok(Json(Envelope::ok("success", Profile::from(&user))))
}
