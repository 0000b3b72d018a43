// Shared application state handed to every handler

use std::sync::Arc;

use crate::agent::AgentService;
use crate::auth::TokenService;
use crate::billing::PaymentGateway;
use crate::config::AppConfig;
use crate::store::Store;

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn Store>,
    pub agent: Arc<AgentService>,
    pub tokens: TokenService,
    /// Absent when `STRIPE_SECRET_KEY` is not configured
    pub payments: Option<Arc<dyn PaymentGateway>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        agent: Arc<AgentService>,
        payments: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        let tokens = TokenService::new(&config.secret_key, config.access_token_expire_minutes);
        Self {
            config,
            store,
            agent,
            tokens,
            payments,
        }
    }
}

pub type SharedState = Arc<AppState>;
