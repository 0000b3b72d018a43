// Reusable warp filters: shared state, authentication, request bodies

use serde::de::DeserializeOwned;
use std::convert::Infallible;
use tracing::debug;
use warp::{Filter, Rejection};

use crate::auth::parse_bearer;
use crate::error::ApiError;
use crate::state::SharedState;
use crate::store::User;

/// Largest accepted request body
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn with_state(
    state: SharedState,
) -> impl Filter<Extract = (SharedState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Resolve the bearer token to an active user
pub fn authenticated(
    state: SharedState,
) -> impl Filter<Extract = (User,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(with_state(state))
        .and_then(authenticate)
}

/// An authenticated user with an active premium subscription
pub fn premium_user(
    state: SharedState,
) -> impl Filter<Extract = (User,), Error = Rejection> + Clone {
    authenticated(state).and_then(require_premium)
}

/// JSON body with a size limit
pub fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

async fn authenticate(header: Option<String>, state: SharedState) -> Result<User, Rejection> {
    let token = parse_bearer(header.as_deref()).map_err(ApiError::from)?;
    let user_id = state.tokens.verify(token).map_err(ApiError::from)?;

    match state.store.get_user(user_id).await.map_err(ApiError::from)? {
        Some(user) if user.is_active => Ok(user),
        Some(user) => {
            debug!(user_id = user.id, "Rejected inactive user");
            Err(ApiError::Unauthorized("Inactive user".to_string()).into())
        }
        None => Err(ApiError::Unauthorized("Could not validate credentials".to_string()).into()),
    }
}

async fn require_premium(user: User) -> Result<User, Rejection> {
    if user.is_premium {
        Ok(user)
    } else {
        let detail = "Premium subscription required to access UX AI agent";
        Err(ApiError::Forbidden(detail.to_string()).into())
    }
}
