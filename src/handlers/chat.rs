// POST /api/ux-agent/chat and the chat-history endpoints

use tracing::info;
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::agent::{AgentType, ReplySource};
use crate::error::ApiError;
use crate::models::{ChatHistoryResponse, ChatRequest, ChatResponse, MessageResponse};
use crate::state::SharedState;
use crate::store::{ChatMessage, User};

const TITLE_CHARS: usize = 50;

/// Title for a conversation started by `message`
pub fn conversation_title(message: &str) -> String {
    let message = message.trim();
    match message.char_indices().nth(TITLE_CHARS) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

pub(crate) fn parse_agent_type(key: Option<&str>) -> Result<AgentType, ApiError> {
    match key {
        None => Ok(AgentType::default()),
        Some(key) => key
            .trim()
            .parse::<AgentType>()
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

pub async fn chat_handler(
    user: User,
    request: ChatRequest,
    state: SharedState,
) -> Result<Response, Rejection> {
    if request.message.trim().is_empty() {
        return Err(ApiError::Unprocessable("Message must not be empty".to_string()).into());
    }
    let agent = parse_agent_type(request.agent_type.as_deref())?;

    let (conversation_id, history) = match request.conversation_id {
        Some(id) => {
            let conversation = state
                .store
                .get_conversation(user.id, id)
                .await
                .map_err(ApiError::from)?
                .ok_or_else(ApiError::conversation_not_found)?;
            (id, conversation.messages)
        }
        None => {
            let summary = state
                .store
                .create_conversation(user.id, &conversation_title(&request.message), agent.as_str())
                .await
                .map_err(ApiError::from)?;
            (summary.id, Vec::new())
        }
    };

    let reply = state.agent.respond(agent, &request.message, &history).await;

    let turn = [
        ChatMessage::user(request.message.clone()),
        ChatMessage::assistant(reply.text.clone()),
    ];
    state
        .store
        .append_messages(user.id, conversation_id, &turn)
        .await
        .map_err(ApiError::from)?;

    info!(
        user_id = user.id,
        conversation_id,
        agent = %agent,
        fallback = reply.source == ReplySource::Fallback,
        "Chat turn completed"
    );

    let mut chat_history = history;
    chat_history.extend(turn);

    let body = ChatResponse {
        response: reply.text,
        agent_used: reply.agent,
        knowledge_sources: reply.knowledge_sources,
        conversation_id,
        chat_history,
    };
    Ok(warp::reply::json(&body).into_response())
}

pub async fn get_chat_history_handler(
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

    let body = ChatHistoryResponse {
        conversation_id,
        messages: conversation.messages,
    };
    Ok(warp::reply::json(&body).into_response())
}

pub async fn clear_chat_history_handler(
    conversation_id: i64,
    user: User,
    state: SharedState,
) -> Result<Response, Rejection> {
    let cleared = state
        .store
        .clear_messages(user.id, conversation_id)
        .await
        .map_err(ApiError::from)?;
    if !cleared {
        return Err(ApiError::conversation_not_found().into());
    }

    let body = MessageResponse::new(format!(
        "Chat history cleared for conversation {}",
        conversation_id
    ));
    Ok(warp::reply::json(&body).into_response())
}
