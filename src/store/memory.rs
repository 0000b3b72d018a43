use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::error::{Error, Result};
use super::types::{
    ChatMessage, Conversation, ConversationSummary, NewPayment, NewUser, Payment, PaymentStatus,
    ProfileUpdate, User,
};
use super::Store;

#[derive(Default)]
struct State {
    next_user_id: i64,
    next_conversation_id: i64,
    next_payment_id: i64,
    users: HashMap<i64, User>,
    conversations: HashMap<i64, Conversation>,
    payments: HashMap<i64, Payment>,
}

impl State {
    fn owned_conversation(
        &mut self,
        user_id: i64,
        conversation_id: i64,
    ) -> Option<&mut Conversation> {
        self.conversations
            .get_mut(&conversation_id)
            .filter(|c| c.summary.user_id == user_id)
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != except)
    }
}

/// In-process store used when no database is configured.
///
/// Data lives for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| Error::DatabaseError("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn migrate(&self) -> Result<()> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut state = self.lock()?;
        if state.email_taken(&user.email, None) {
            return Err(Error::ConflictError("Email already registered".to_string()));
        }
        if state.users.values().any(|u| u.username == user.username) {
            return Err(Error::ConflictError("Username already taken".to_string()));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let record = User {
            id: state.next_user_id,
            email: user.email,
            username: user.username,
            hashed_password: user.hashed_password,
            full_name: user.full_name,
            is_active: true,
            is_premium: false,
            subscription_id: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(&user_id).cloned())
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|u| u.username == login || u.email.eq_ignore_ascii_case(login))
            .cloned())
    }

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<User> {
        let mut state = self.lock()?;
        if let Some(email) = &update.email {
            if state.email_taken(email, Some(user_id)) {
                return Err(Error::ConflictError("Email already registered".to_string()));
            }
        }

        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFoundError(format!("user {}", user_id)))?;
        if let Some(full_name) = update.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn grant_premium(&self, user_id: i64, subscription_id: &str) -> Result<()> {
        let mut state = self.lock()?;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFoundError(format!("user {}", user_id)))?;
        user.is_premium = true;
        user.subscription_id = Some(subscription_id.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool> {
        let mut state = self.lock()?;
        if state.users.remove(&user_id).is_none() {
            return Ok(false);
        }
        state.conversations.retain(|_, c| c.summary.user_id != user_id);
        state.payments.retain(|_, p| p.user_id != user_id);
        Ok(true)
    }

    async fn create_conversation(
        &self,
        user_id: i64,
        title: &str,
        agent_type: &str,
    ) -> Result<ConversationSummary> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&user_id) {
            return Err(Error::NotFoundError(format!("user {}", user_id)));
        }

        state.next_conversation_id += 1;
        let now = Utc::now();
        let summary = ConversationSummary {
            id: state.next_conversation_id,
            user_id,
            title: title.to_string(),
            agent_type: agent_type.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.conversations.insert(
            summary.id,
            Conversation {
                summary: summary.clone(),
                messages: Vec::new(),
            },
        );
        Ok(summary)
    }

    async fn list_conversations(&self, user_id: i64) -> Result<Vec<ConversationSummary>> {
        let state = self.lock()?;
        let mut summaries: Vec<ConversationSummary> = state
            .conversations
            .values()
            .filter(|c| c.summary.user_id == user_id)
            .map(|c| c.summary.clone())
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }

    async fn get_conversation(
        &self,
        user_id: i64,
        conversation_id: i64,
    ) -> Result<Option<Conversation>> {
        let mut state = self.lock()?;
        Ok(state.owned_conversation(user_id, conversation_id).map(|c| c.clone()))
    }

    async fn append_messages(
        &self,
        user_id: i64,
        conversation_id: i64,
        messages: &[ChatMessage],
    ) -> Result<()> {
        let mut state = self.lock()?;
        let conversation = state
            .owned_conversation(user_id, conversation_id)
            .ok_or_else(|| Error::NotFoundError(format!("conversation {}", conversation_id)))?;
        conversation.messages.extend_from_slice(messages);
        conversation.summary.updated_at = Utc::now();
        Ok(())
    }

    async fn clear_messages(&self, user_id: i64, conversation_id: i64) -> Result<bool> {
        let mut state = self.lock()?;
        match state.owned_conversation(user_id, conversation_id) {
            Some(conversation) => {
                conversation.messages.clear();
                conversation.summary.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_conversation(&self, user_id: i64, conversation_id: i64) -> Result<bool> {
        let mut state = self.lock()?;
        if state.owned_conversation(user_id, conversation_id).is_none() {
            return Ok(false);
        }
        state.conversations.remove(&conversation_id);
        Ok(true)
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        let mut state = self.lock()?;
        if state
            .payments
            .values()
            .any(|p| p.stripe_payment_intent_id == payment.stripe_payment_intent_id)
        {
            return Err(Error::ConflictError("Payment already recorded".to_string()));
        }

        state.next_payment_id += 1;
        let record = Payment {
            id: state.next_payment_id,
            user_id: payment.user_id,
            stripe_payment_intent_id: payment.stripe_payment_intent_id,
            amount_cents: payment.amount_cents,
            currency: payment.currency,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        };
        state.payments.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_payment(&self, payment_intent_id: &str) -> Result<Option<Payment>> {
        let state = self.lock()?;
        Ok(state
            .payments
            .values()
            .find(|p| p.stripe_payment_intent_id == payment_intent_id)
            .cloned())
    }

    async fn update_payment_status(
        &self,
        payment_intent_id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Payment>> {
        let mut state = self.lock()?;
        Ok(state
            .payments
            .values_mut()
            .find(|p| p.stripe_payment_intent_id == payment_intent_id)
            .map(|p| {
                p.status = status;
                p.clone()
            }))
    }
}
