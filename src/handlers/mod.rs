// Handlers module

pub mod auth;
pub mod chat;
pub mod conversations;
pub mod payment;
pub mod system;
pub mod user;

pub use auth::{login_handler, me_handler, register_handler};
pub use chat::{chat_handler, clear_chat_history_handler, get_chat_history_handler};
pub use conversations::{
    create_conversation_handler, delete_conversation_handler, get_conversation_handler,
    list_conversations_handler,
};
pub use payment::{create_payment_intent_handler, pricing_handler, webhook_handler};
pub use system::{agents_handler, health_handler, root_handler};
pub use user::{delete_account_handler, get_profile_handler, update_profile_handler};
