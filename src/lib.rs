// HTTP server modules
pub mod error;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub mod config;

// Persistence: PostgreSQL or in-memory
pub mod store;

// Authentication: password hashing and access tokens
pub mod auth;

// LLM abstraction layer
pub mod llm;

// Personas, prompt assembly and fallback replies
pub mod agent;
pub mod knowledge;

// Stripe payments
pub mod billing;
