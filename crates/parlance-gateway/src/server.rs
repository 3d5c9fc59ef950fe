//! Gateway server wiring — routes, adapter construction, startup

use crate::ws::handle_connection;
use axum::{
    extract::{Path as AxumPath, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use parlance_core::GatewayConfig;
use parlance_engine::SessionLifecycle;
use parlance_llm::GroqClient;
use parlance_store::{EventLog, SessionStore, SqliteStore};
use parlance_tools::create_default_registry;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ServeConfig {
    pub gateway: GatewayConfig,
    pub groq_api_key: Option<String>,
    pub database_path: PathBuf,
    pub model: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            groq_api_key: None,
            database_path: PathBuf::from("parlance.db"),
            model: None,
        }
    }
}

pub struct AppState {
    pub lifecycle: Arc<SessionLifecycle>,
}

pub async fn start_gateway(config: ServeConfig) -> anyhow::Result<()> {
    let api_key = config
        .groq_api_key
        .or_else(|| std::env::var("GROQ_API_KEY").ok())
        .ok_or_else(|| anyhow::anyhow!("GROQ_API_KEY not set"))?;

    let mut client = GroqClient::new(&api_key);
    if let Ok(base_url) = std::env::var("GROQ_API_URL") {
        info!("Using custom API URL: {}", base_url);
        client = client.with_base_url(base_url);
    }
    if let Some(model) = config
        .model
        .or_else(|| std::env::var("PARLANCE_MODEL").ok())
    {
        client = client.with_model(model);
    }

    let store = Arc::new(SqliteStore::open(&config.database_path).await?);
    let tools = Arc::new(create_default_registry());
    info!("Registered tools: {:?}", tools.list());

    let lifecycle = Arc::new(SessionLifecycle::new(
        store.clone() as Arc<dyn EventLog>,
        store as Arc<dyn SessionStore>,
        Arc::new(client),
        tools,
    ));

    let state = Arc::new(AppState { lifecycle });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ws/session/:session_id", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state);

    let bind_addr: SocketAddr =
        format!("{}:{}", config.gateway.bind.to_addr(), config.gateway.port).parse()?;

    info!("Parlance v{} starting", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", bind_addr);
    info!("  WebSocket: ws://{}/ws/session/{{session_id}}", bind_addr);
    info!("  Database: {}", config.database_path.display());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn ws_handler(
    AxumPath(session_id): AxumPath<String>,
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    // Any path string is accepted as-is; session ids are opaque.
    ws.on_upgrade(move |socket| handle_connection(socket, session_id, state.lifecycle.clone()))
}

async fn index_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "running",
        "service": "Parlance Conversational Relay",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "endpoints": {
            "websocket": "/ws/session/{session_id}",
            "health": "/health"
        },
        "features": [
            "Real-time WebSocket streaming",
            "Tool calling & function execution",
            "Async event persistence (SQLite)",
            "Post-session summarization"
        ]
    }))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
