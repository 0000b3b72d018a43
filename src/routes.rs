// Route definitions

use std::convert::Infallible;
use std::path::PathBuf;

use tracing::{info, warn};
use warp::filters::BoxedFilter;
use warp::reply::Response;
use warp::{Filter, Reply};

use crate::error::handle_rejection;
use crate::filters::{authenticated, json_body, premium_user, with_state, MAX_BODY_BYTES};
use crate::handlers;
use crate::state::SharedState;

/// Origin of the local frontend dev server, always allowed by CORS
pub const DEV_ORIGIN: &str = "http://localhost:3000";

/// Build the complete filter: every endpoint, CORS, rejection handling and access logging.
pub fn configure_routes(
    state: SharedState,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let routes = system_routes(state.clone())
        .or(auth_routes(state.clone()))
        .unify()
        .or(agent_routes(state.clone()))
        .unify()
        .or(user_routes(state.clone()))
        .unify()
        .or(payment_routes(state.clone()))
        .unify()
        .or(static_files(state.config.static_dir.clone()))
        .unify();

    routes
        .with(cors(&state.config.frontend_url))
        .recover(handle_rejection)
        .with(warp::log::custom(|info| {
            info!(
                method = %info.method(),
                path = info.path(),
                status = info.status().as_u16(),
                elapsed_ms = info.elapsed().as_millis() as u64,
                "request"
            );
        }))
}

fn system_routes(state: SharedState) -> BoxedFilter<(Response,)> {
    // GET /
    let root = warp::path::end()
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::root_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::health_handler);

    root.or(health).unify().boxed()
}

fn auth_routes(state: SharedState) -> BoxedFilter<(Response,)> {
    let auth = warp::path("api").and(warp::path("auth"));

    // POST /api/auth/register
    let register = auth
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::register_handler);

    // POST /api/auth/login
    let login = auth
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::login_handler);

    // GET /api/auth/me
    let me = auth
        .and(warp::path("me"))
        .and(warp::path::end())
        .and(warp::get())
        .and(authenticated(state))
        .and_then(handlers::me_handler);

    register.or(login).unify().or(me).unify().boxed()
}

fn agent_routes(state: SharedState) -> BoxedFilter<(Response,)> {
    let agent = warp::path("api").and(warp::path("ux-agent"));

    // GET /api/ux-agent/agents
    let agents = agent
        .and(warp::path("agents"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::agents_handler);

    // POST /api/ux-agent/chat
    let chat = agent
        .and(warp::path("chat"))
        .and(warp::path::end())
        .and(warp::post())
        .and(premium_user(state.clone()))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::chat_handler);

    // GET /api/ux-agent/chat-history/{id}
    let get_history = agent
        .and(warp::path("chat-history"))
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(authenticated(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::get_chat_history_handler);

    // DELETE /api/ux-agent/chat-history/{id}
    let clear_history = agent
        .and(warp::path("chat-history"))
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(authenticated(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::clear_chat_history_handler);

    // POST /api/ux-agent/conversations
    let create_conversation = agent
        .and(warp::path("conversations"))
        .and(warp::path::end())
        .and(warp::post())
        .and(authenticated(state.clone()))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::create_conversation_handler);

    // GET /api/ux-agent/conversations
    let list_conversations = agent
        .and(warp::path("conversations"))
        .and(warp::path::end())
        .and(warp::get())
        .and(authenticated(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::list_conversations_handler);

    // GET /api/ux-agent/conversations/{id}
    let get_conversation = agent
        .and(warp::path("conversations"))
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(authenticated(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::get_conversation_handler);

    // DELETE /api/ux-agent/conversations/{id}
    let delete_conversation = agent
        .and(warp::path("conversations"))
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(authenticated(state.clone()))
        .and(with_state(state))
        .and_then(handlers::delete_conversation_handler);

    let chat_routes = agents
        .or(chat)
        .unify()
        .or(get_history)
        .unify()
        .or(clear_history)
        .unify()
        .boxed();

    let conversation_routes = create_conversation
        .or(list_conversations)
        .unify()
        .or(get_conversation)
        .unify()
        .or(delete_conversation)
        .unify()
        .boxed();

    chat_routes.or(conversation_routes).unify().boxed()
}

fn user_routes(state: SharedState) -> BoxedFilter<(Response,)> {
    let user = warp::path("api").and(warp::path("user"));

    // GET /api/user/profile
    let get_profile = user
        .and(warp::path("profile"))
        .and(warp::path::end())
        .and(warp::get())
        .and(authenticated(state.clone()))
        .and_then(handlers::get_profile_handler);

    // PUT /api/user/profile
    let update_profile = user
        .and(warp::path("profile"))
        .and(warp::path::end())
        .and(warp::put())
        .and(authenticated(state.clone()))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::update_profile_handler);

    // DELETE /api/user/account
    let delete_account = user
        .and(warp::path("account"))
        .and(warp::path::end())
        .and(warp::delete())
        .and(authenticated(state.clone()))
        .and(with_state(state))
        .and_then(handlers::delete_account_handler);

    get_profile
        .or(update_profile)
        .unify()
        .or(delete_account)
        .unify()
        .boxed()
}

fn payment_routes(state: SharedState) -> BoxedFilter<(Response,)> {
    let payment = warp::path("api").and(warp::path("payment"));

    // POST /api/payment/create-payment-intent
    let create_intent = payment
        .and(warp::path("create-payment-intent"))
        .and(warp::path::end())
        .and(warp::post())
        .and(authenticated(state.clone()))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::create_payment_intent_handler);

    // POST /api/payment/webhook
    // The raw body is needed for signature verification.
    let webhook = payment
        .and(warp::path("webhook"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::header::optional::<String>("stripe-signature"))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_state(state))
        .and_then(handlers::webhook_handler);

    // GET /api/payment/pricing
    let pricing = payment
        .and(warp::path("pricing"))
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::pricing_handler);

    create_intent
        .or(webhook)
        .unify()
        .or(pricing)
        .unify()
        .boxed()
}

/// GET /static/... when a static directory is configured
fn static_files(dir: Option<PathBuf>) -> BoxedFilter<(Response,)> {
    match dir {
        Some(dir) => warp::path("static")
            .and(warp::fs::dir(dir))
            .map(Reply::into_response)
            .boxed(),
        None => warp::any()
            .and_then(|| async { Err::<Response, _>(warp::reject::not_found()) })
            .boxed(),
    }
}

fn cors(frontend_url: &str) -> warp::cors::Builder {
    let origins = cors_origins(frontend_url);
    warp::cors()
        .allow_origins(origins.iter().map(String::as_str))
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec!["authorization", "content-type"])
        .allow_credentials(true)
}

/// Origins accepted by CORS. A malformed `FRONTEND_URL` is skipped.
pub fn cors_origins(frontend_url: &str) -> Vec<String> {
    let mut origins = vec![DEV_ORIGIN.to_string()];

    let frontend = frontend_url.trim().trim_end_matches('/');
    let well_formed = match frontend.split_once("://") {
        Some((scheme, host)) => {
            matches!(scheme, "http" | "https") && !host.is_empty() && !host.contains('/')
        }
        None => false,
    };

    if !well_formed {
        warn!(frontend_url, "Ignoring malformed FRONTEND_URL for CORS");
    } else if frontend != DEV_ORIGIN {
        origins.push(frontend.to_string());
    }
    origins
}
