// Request and response bodies of the JSON API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentType;
use crate::knowledge::KnowledgeSummary;
use crate::store::{ChatMessage, Conversation, ConversationSummary, User};

// Auth

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Either `username` or `email` identifies the account
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn login(&self) -> Option<&str> {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            is_premium: user.is_premium,
            created_at: user.created_at,
        }
    }
}

// User

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// UX agent

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Persona key; `triage` when absent
    #[serde(default)]
    pub agent_type: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub agent_used: AgentType,
    pub knowledge_sources: Vec<String>,
    pub conversation_id: i64,
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    pub conversation_id: i64,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationRequest {
    pub title: String,
    #[serde(default)]
    pub agent_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub id: i64,
    pub title: String,
    pub agent_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChatMessage>>,
}

impl From<&ConversationSummary> for ConversationResponse {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            agent_type: summary.agent_type.clone(),
            created_at: summary.created_at,
            updated_at: summary.updated_at,
            messages: None,
        }
    }
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            messages: Some(conversation.messages),
            ..Self::from(&conversation.summary)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentsResponse {
    /// Persona key to `"{name} - {description}"`
    pub agents: serde_json::Map<String, serde_json::Value>,
    pub knowledge_summary: KnowledgeSummary,
}

// Payments

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in cents
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub subscription_type: String,
}

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

// Service

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub status: String,
    pub service: String,
    pub ollama_available: bool,
    pub ollama_model: Option<String>,
    pub llm_type: String,
    pub storage: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MessageRole;

    #[test]
    fn test_chat_request_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "Hi"}"#).unwrap();
        assert_eq!(request.message, "Hi");
        assert!(request.agent_type.is_none());
        assert!(request.conversation_id.is_none());
    }

    #[test]
    fn test_login_accepts_username_or_email() {
        let by_name: LoginRequest =
            serde_json::from_str(r#"{"username": "ada", "password": "pw"}"#).unwrap();
        assert_eq!(by_name.login(), Some("ada"));

        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email": "ada@example.com", "password": "pw"}"#).unwrap();
        assert_eq!(by_email.login(), Some("ada@example.com"));

        let neither: LoginRequest = serde_json::from_str(r#"{"password": "pw"}"#).unwrap();
        assert_eq!(neither.login(), None);
    }

    #[test]
    fn test_payment_intent_currency_defaults_to_usd() {
        let request: CreatePaymentIntentRequest =
            serde_json::from_str(r#"{"amount": 9999, "subscription_type": "premium"}"#).unwrap();
        assert_eq!(request.currency, "usd");
    }

    #[test]
    fn test_chat_response_serialization() {
        let response = ChatResponse {
            response: "Try a journey map".to_string(),
            agent_used: AgentType::Workflow,
            knowledge_sources: vec!["UX Knowledge Base".to_string()],
            conversation_id: 3,
            chat_history: vec![ChatMessage::user("Hi")],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["agent_used"], "workflow");
        assert_eq!(value["conversation_id"], 3);
        assert_eq!(value["chat_history"][0]["role"], "user");
    }

    #[test]
    fn test_conversation_summary_omits_messages() {
        let now = Utc::now();
        let summary = ConversationSummary {
            id: 1,
            user_id: 1,
            title: "Flows".to_string(),
            agent_type: "workflow".to_string(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(ConversationResponse::from(&summary)).unwrap();
        assert!(value.get("messages").is_none());

        let full = ConversationResponse::from(Conversation {
            summary,
            messages: vec![ChatMessage::new(MessageRole::Assistant, "Hello")],
        });
        let value = serde_json::to_value(full).unwrap();
        assert_eq!(value["messages"][0]["role"], "assistant");
    }
}
