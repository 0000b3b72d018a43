// /api/ux-agent/conversations endpoints

use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use super::chat::parse_agent_type;
use crate::error::ApiError;
use crate::models::{ConversationResponse, CreateConversationRequest, MessageResponse};
use crate::state::SharedState;
use crate::store::User;

pub async fn create_conversation_handler(
    user: User,
    request: CreateConversationRequest,
    state: SharedState,
) -> Result<Response, Rejection> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::Unprocessable("Title must not be empty".to_string()).into());
    }
    let agent = parse_agent_type(request.agent_type.as_deref())?;

    let summary = state
        .store
        .create_conversation(user.id, title, agent.as_str())
        .await
        .map_err(ApiError::from)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&ConversationResponse::from(&summary)),
        StatusCode::CREATED,
    )
    .into_response())
}

pub async fn list_conversations_handler(
    user: User,
    state: SharedState,
) -> Result<Response, Rejection> {
    let conversations: Vec<ConversationResponse> = state
        .store
        .list_conversations(user.id)
        .await
        .map_err(ApiError::from)?
        .iter()
        .map(ConversationResponse::from)
        .collect();

    Ok(warp::reply::json(&conversations).into_response())
}

pub async fn get_conversation_handler(
    conversation_id: i64,
    user: User,
    state: SharedState,
) -> Result<Response, Rejection> {
    let conversation = state
        .store
        .get_conversation(user.id, conversation_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(ApiError::conversation_not_found)?;

    Ok(warp::reply::json(&ConversationResponse::from(conversation)).into_response())
}

pub async fn delete_conversation_handler(
    conversation_id: i64,
    user: User,
    state: SharedState,
) -> Result<Response, Rejection> {
    let deleted = state
        .store
        .delete_conversation(user.id, conversation_id)
        .await
        .map_err(ApiError::from)?;
    if !deleted {
        return Err(ApiError::conversation_not_found().into());
    }

    Ok(warp::reply::json(&MessageResponse::new("Conversation deleted")).into_response())
}
