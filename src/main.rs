use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ux_agent::agent::AgentService;
use ux_agent::billing::{PaymentGateway, StripeClient, StripeConfig};
use ux_agent::config::{AppConfig, LogFormat};
use ux_agent::knowledge::KnowledgeBase;
use ux_agent::llm::{LlmProvider, OllamaClient, OllamaConfig};
use ux_agent::routes::configure_routes;
use ux_agent::state::{AppState, SharedState};
use ux_agent::store::{DbConfig, MemoryStore, PostgresStore, Store};

const DEFAULT_LOG_FILTER: &str = "ux_agent=info,warp=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    info!(version = env!("CARGO_PKG_VERSION"), "UX agent starting");
    if config.uses_default_secret() {
        warn!("SECRET_KEY is not set; using the development default");
    }

    let addr = config.bind_addr();
    let state = build_state(config).await?;
    let routes = configure_routes(state);

    info!(%addr, "Listening");
    warp::serve(routes).run(addr).await;
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
}

async fn build_state(config: AppConfig) -> Result<SharedState, Box<dyn Error>> {
    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(url) => {
            let db = DbConfig::from_connection_string(url)?
                .with_max_pool_size(config.database_pool_size);
            Arc::new(PostgresStore::new(db).await?)
        }
        None => {
            warn!("DATABASE_URL is not set; data is kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    store.migrate().await?;
    info!(backend = store.backend_name(), "Store ready");

    let knowledge = match config.knowledge_dir.as_deref() {
        Some(dir) => KnowledgeBase::load(dir),
        None => KnowledgeBase::empty(),
    };

    let ollama = OllamaConfig::new(config.ollama_base_url.clone(), config.ollama_model.clone())
        .with_api_key(config.ollama_api_key.clone())
        .with_request_timeout(config.ollama_timeout);
    let provider: Arc<dyn LlmProvider> = Arc::new(OllamaClient::new(ollama)?);

    let agent = Arc::new(
        AgentService::new(provider, Arc::new(knowledge))
            .with_generation_config(config.generation()),
    );
    agent.probe().await;

    let payments: Option<Arc<dyn PaymentGateway>> = match config.stripe_secret_key.as_deref() {
        Some(key) => {
            let client = StripeClient::new(StripeConfig::new(key, config.stripe_api_base.clone()))?;
            Some(Arc::new(client))
        }
        None => {
            warn!("STRIPE_SECRET_KEY is not set; payment intents are disabled");
            None
        }
    };

    Ok(Arc::new(AppState::new(config, store, agent, payments)))
}
