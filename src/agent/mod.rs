//! UX agent personas, prompt assembly and fallback replies

pub mod fallback;
pub mod persona;
pub mod prompt;
pub mod service;

pub use fallback::fallback_reply;
pub use persona::{AgentType, Persona, UnknownAgentType};
pub use prompt::{build_prompt, HISTORY_WINDOW};
pub use service::{AgentReply, AgentService, ReplySource};
