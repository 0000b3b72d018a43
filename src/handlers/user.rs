// /api/user endpoints

use tracing::info;
use warp::reply::Response;
use warp::{Rejection, Reply};

use super::auth::normalize_email;
use crate::error::ApiError;
use crate::models::{MessageResponse, ProfileUpdateRequest, ProfileUpdateResponse, UserResponse};
use crate::state::SharedState;
use crate::store::{ProfileUpdate, User};

pub async fn get_profile_handler(user: User) -> Result<Response, Rejection> {
    Ok(warp::reply::json(&UserResponse::from(&user)).into_response())
}

pub async fn update_profile_handler(
    user: User,
    request: ProfileUpdateRequest,
    state: SharedState,
) -> Result<Response, Rejection> {
    let email = match request.email.as_deref() {
        Some(raw) => Some(normalize_email(raw).ok_or_else(|| {
            ApiError::Unprocessable("Invalid email address".to_string())
        })?),
        None => None,
    };

    let updated = state
        .store
        .update_profile(
            user.id,
            ProfileUpdate {
                full_name: request.full_name,
                email,
            },
        )
        .await
        .map_err(ApiError::from)?;

    let body = ProfileUpdateResponse {
        message: "Profile updated successfully".to_string(),
        user: UserResponse::from(&updated),
    };
    Ok(warp::reply::json(&body).into_response())
}

pub async fn delete_account_handler(user: User, state: SharedState) -> Result<Response, Rejection> {
    let deleted = state.store.delete_user(user.id).await.map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()).into());
    }

    info!(user_id = user.id, "Account deleted");
    Ok(warp::reply::json(&MessageResponse::new("Account deleted successfully")).into_response())
}
