//! Persistence for users, conversations and payments
//!
//! Two backends implement [`Store`]: [`PostgresStore`] for deployments with a
//! `DATABASE_URL`, and [`MemoryStore`] for local runs without a database.
//! Every conversation operation takes the owner's id; a conversation that
//! belongs to someone else is indistinguishable from one that doesn't exist.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod types;

use async_trait::async_trait;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use postgres::{DbConfig, PostgresStore};
pub use types::{
    ChatMessage, Conversation, ConversationSummary, MessageRole, NewPayment, NewUser, Payment,
    PaymentStatus, ProfileUpdate, User,
};

/// Storage backend used by the HTTP handlers
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs and the health endpoint
    fn backend_name(&self) -> &'static str;

    /// Create tables if they don't exist yet
    async fn migrate(&self) -> Result<()>;

    /// Register a user; fails with `ConflictError` on a duplicate email or username
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Look a user up by username or email
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>>;

    /// Apply a profile update; fails with `ConflictError` when the new email is taken
    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<User>;

    /// Mark a user as premium after a successful payment
    async fn grant_premium(&self, user_id: i64, subscription_id: &str) -> Result<()>;

    /// Delete a user together with everything they own
    async fn delete_user(&self, user_id: i64) -> Result<bool>;

    async fn create_conversation(
        &self,
        user_id: i64,
        title: &str,
        agent_type: &str,
    ) -> Result<ConversationSummary>;

    /// Conversations of a user, most recently active first
    async fn list_conversations(&self, user_id: i64) -> Result<Vec<ConversationSummary>>;

    async fn get_conversation(
        &self,
        user_id: i64,
        conversation_id: i64,
    ) -> Result<Option<Conversation>>;

    /// Append messages in order and bump the conversation's `updated_at`
    async fn append_messages(
        &self,
        user_id: i64,
        conversation_id: i64,
        messages: &[ChatMessage],
    ) -> Result<()>;

    /// Remove all messages but keep the conversation
    async fn clear_messages(&self, user_id: i64, conversation_id: i64) -> Result<bool>;

    async fn delete_conversation(&self, user_id: i64, conversation_id: i64) -> Result<bool>;

    /// Record a pending payment
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;

    /// Look up a payment by its PaymentIntent id
    async fn find_payment(&self, payment_intent_id: &str) -> Result<Option<Payment>>;

    /// Update a payment by its PaymentIntent id; `None` when no such payment exists
    async fn update_payment_status(
        &self,
        payment_intent_id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Payment>>;
}
