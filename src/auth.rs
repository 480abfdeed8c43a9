//! Caller identity. Sign-in happens upstream; requests arrive carrying the
//! caller's profile id in the `X-Profile-Id` header.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::{request::Parts, HeaderMap};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::Profile;
use crate::db::repositories::ProfileRepository;
use crate::error::{AppError, AppResult};

pub const PROFILE_HEADER: &str = "x-profile-id";

/// The profile behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

impl CurrentProfile {
    /// Fails with 403 for roles that may not register programs.
    pub fn require_training_creator(&self) -> AppResult<()> {
        if self.0.role.can_create_training() {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Role {} cannot create training programs",
                self.0.role.as_str()
            )))
        }
    }
}

/// `Ok(None)` when the header is absent, an error when it is malformed.
fn profile_id_from_headers(headers: &HeaderMap) -> AppResult<Option<Uuid>> {
    let Some(value) = headers.get(PROFILE_HEADER) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| AppError::Authentication("Profile header is not valid text".to_string()))?;
    Uuid::parse_str(raw.trim())
        .map(Some)
        .map_err(|_| AppError::Authentication(format!("Malformed profile id: {}", raw)))
}

async fn load_profile(state: &AppState, profile_id: Uuid) -> AppResult<CurrentProfile> {
    let profile = ProfileRepository::get_profile(&state.db, profile_id)
        .await?
        .ok_or_else(|| AppError::Authentication(format!("Unknown profile {}", profile_id)))?;
    Ok(CurrentProfile(profile))
}

impl FromRequestParts<AppState> for CurrentProfile {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let profile_id = profile_id_from_headers(&parts.headers)?
            .ok_or_else(|| AppError::Authentication("Missing profile header".to_string()))?;
        load_profile(state, profile_id).await
    }
}

impl OptionalFromRequestParts<AppState> for CurrentProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match profile_id_from_headers(&parts.headers)? {
            Some(profile_id) => load_profile(state, profile_id).await.map(Some),
            None => Ok(None),
        }
    }
}
