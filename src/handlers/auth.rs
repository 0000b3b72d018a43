// POST /api/auth/register, POST /api/auth/login, GET /api/auth/me

use tracing::info;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::auth::{hash_password_async, verify_password_async, AuthError};
use crate::error::ApiError;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use crate::state::SharedState;
use crate::store::{NewUser, User};

const MIN_PASSWORD_LEN: usize = 8;

/// Lowercased, trimmed email; `None` when it doesn't look like an address
pub(crate) fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    let valid = !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace);
    valid.then_some(email)
}

fn validate_registration(request: &RegisterRequest) -> Result<(String, String), ApiError> {
    let email = normalize_email(&request.email)
        .ok_or_else(|| ApiError::Unprocessable("Invalid email address".to_string()))?;

    let username = request.username.trim();
    let length = username.chars().count();
    if !(3..=50).contains(&length) {
        return Err(ApiError::Unprocessable(
            "Username must be between 3 and 50 characters".to_string(),
        ));
    }
    if username.contains('@') || username.contains(char::is_whitespace) {
        return Err(ApiError::Unprocessable(
            "Username must not contain '@' or whitespace".to_string(),
        ));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Unprocessable(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    Ok((email, username.to_string()))
}

pub async fn register_handler(
    request: RegisterRequest,
    state: SharedState,
) -> Result<Response, Rejection> {
    let (email, username) = validate_registration(&request)?;
    let hashed_password = hash_password_async(request.password.clone())
        .await
        .map_err(ApiError::from)?;

    let user = state
        .store
        .create_user(NewUser {
            email,
            username,
            hashed_password,
            full_name: request.full_name.filter(|n| !n.trim().is_empty()),
        })
        .await
        .map_err(ApiError::from)?;

    info!(user_id = user.id, username = %user.username, "User registered");
    let body = warp::reply::json(&UserResponse::from(&user));
    Ok(warp::reply::with_status(body, StatusCode::CREATED).into_response())
}

pub async fn login_handler(
    request: LoginRequest,
    state: SharedState,
) -> Result<Response, Rejection> {
    let invalid = || ApiError::Unauthorized("Incorrect username or password".to_string());

    let login = request.login().ok_or_else(invalid)?;
    let user = state
        .store
        .find_user_by_login(login)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(invalid)?;

    let verified = verify_password_async(request.password.clone(), user.hashed_password.clone())
        .await
        .map_err(ApiError::from)?;
    if !verified {
        return Err(invalid().into());
    }
    if !user.is_active {
        return Err(ApiError::from(AuthError::InvalidCredentials).into());
    }

    let access_token = state.tokens.issue(user.id).map_err(ApiError::from)?;
    info!(user_id = user.id, "User logged in");

    let body = TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.tokens.expires_in(),
    };
    Ok(warp::reply::json(&body).into_response())
}

pub async fn me_handler(user: User) -> Result<Response, Rejection> {
    Ok(warp::reply::json(&UserResponse::from(&user)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            full_name: None,
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM ").as_deref(), Some("ada@example.com"));
        assert!(normalize_email("ada").is_none());
        assert!(normalize_email("@example.com").is_none());
        assert!(normalize_email("ada@localhost").is_none());
        assert!(normalize_email("a da@example.com").is_none());
    }

    #[test]
    fn test_validate_registration() {
        let (email, username) =
            validate_registration(&request("Ada@example.com", " ada ", "long enough")).unwrap();
        assert_eq!(email, "ada@example.com");
        assert_eq!(username, "ada");

        assert!(validate_registration(&request("ada@example.com", "ab", "long enough")).is_err());
        assert!(validate_registration(&request("ada@example.com", "a@b", "long enough")).is_err());
        assert!(validate_registration(&request("ada@example.com", "ada", "short")).is_err());
    }

    #[test]
    fn test_username_length_counts_characters() {
        let accepted = "ü".repeat(30);
        let (_, username) =
            validate_registration(&request("jo@example.com", &accepted, "long enough")).unwrap();
        assert_eq!(username, accepted);

        let too_long = "ü".repeat(51);
        let result = validate_registration(&request("jo@example.com", &too_long, "long enough"));
        assert!(result.is_err());
    }
}
