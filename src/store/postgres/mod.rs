//! PostgreSQL backend
//!
//! Each operation module takes a `&Pool` and runs its own SQL; [`PostgresStore`]
//! wires them into the [`Store`] trait.

pub mod connection;
pub mod conversations;
pub mod payments;
pub mod schema;
pub mod users;

use async_trait::async_trait;
use deadpool_postgres::Pool;
use tracing::info;

pub use connection::DbConfig;

use crate::store::{
    error::Result,
    types::{
        ChatMessage, Conversation, ConversationSummary, NewPayment, NewUser, Payment, PaymentStatus,
        ProfileUpdate, User,
    },
    Store,
};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    /// Build the pool and check that a connection can be made
    pub async fn new(config: DbConfig) -> Result<Self> {
        let pool = config.build_pool()?;

        // Test the connection
        let _conn = pool.get().await?;
        info!(host = %config.host, database = %config.database, "Connected to PostgreSQL");

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn migrate(&self) -> Result<()> {
        schema::migrate(&self.pool).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        users::create_user(&self.pool, user).await
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        users::get_user(&self.pool, user_id).await
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>> {
        users::find_user_by_login(&self.pool, login).await
    }

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<User> {
        users::update_profile(&self.pool, user_id, update).await
    }

    async fn grant_premium(&self, user_id: i64, subscription_id: &str) -> Result<()> {
        users::grant_premium(&self.pool, user_id, subscription_id).await
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool> {
        users::delete_user(&self.pool, user_id).await
    }

    async fn create_conversation(
        &self,
        user_id: i64,
        title: &str,
        agent_type: &str,
    ) -> Result<ConversationSummary> {
        conversations::create_conversation(&self.pool, user_id, title, agent_type).await
    }

    async fn list_conversations(&self, user_id: i64) -> Result<Vec<ConversationSummary>> {
        conversations::list_conversations(&self.pool, user_id).await
    }

    async fn get_conversation(
        &self,
        user_id: i64,
        conversation_id: i64,
    ) -> Result<Option<Conversation>> {
        conversations::get_conversation(&self.pool, user_id, conversation_id).await
    }

    async fn append_messages(
        &self,
        user_id: i64,
        conversation_id: i64,
        messages: &[ChatMessage],
    ) -> Result<()> {
        conversations::append_messages(&self.pool, user_id, conversation_id, messages).await
    }

    async fn clear_messages(&self, user_id: i64, conversation_id: i64) -> Result<bool> {
        conversations::clear_messages(&self.pool, user_id, conversation_id).await
    }

    async fn delete_conversation(&self, user_id: i64, conversation_id: i64) -> Result<bool> {
        conversations::delete_conversation(&self.pool, user_id, conversation_id).await
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        payments::create_payment(&self.pool, payment).await
    }

    async fn find_payment(&self, payment_intent_id: &str) -> Result<Option<Payment>> {
        payments::find_payment(&self.pool, payment_intent_id).await
    }

    async fn update_payment_status(
        &self,
        payment_intent_id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Payment>> {
        payments::update_payment_status(&self.pool, payment_intent_id, status).await
    }
}
