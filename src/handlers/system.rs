// GET /, GET /health and GET /api/ux-agent/agents

use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::agent::AgentType;
use crate::models::{AgentsResponse, ServiceInfo};
use crate::state::SharedState;

fn service_info(state: &SharedState, status: &str) -> ServiceInfo {
    let available = state.agent.is_available();
    ServiceInfo {
        message: "UX AI Agent API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: status.to_string(),
        service: "UX AI Agent".to_string(),
        ollama_available: available,
        ollama_model: available.then(|| state.agent.model().to_string()),
        llm_type: state.agent.llm_type(),
        storage: state.store.backend_name().to_string(),
    }
}

pub async fn root_handler(state: SharedState) -> Result<Response, Rejection> {
    Ok(warp::reply::json(&service_info(&state, "running")).into_response())
}

pub async fn health_handler(state: SharedState) -> Result<Response, Rejection> {
    Ok(warp::reply::json(&service_info(&state, "healthy")).into_response())
}

pub async fn agents_handler(state: SharedState) -> Result<Response, Rejection> {
    let agents = AgentType::all()
        .iter()
        .map(|agent| (agent.as_str().to_string(), serde_json::Value::String(agent.label())))
        .collect();

    let body = AgentsResponse {
        agents,
        knowledge_summary: state.agent.knowledge().summary(),
    };
    Ok(warp::reply::json(&body).into_response())
}
