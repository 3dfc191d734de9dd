use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use flow_valve_core::command::{dialog_fields, CommandSession};
use flow_valve_core::params::FlowValveDefaults;
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod protocol;

use config::ServerConfig;

// Application State
struct AppState {
    defaults: FlowValveDefaults,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Reject a bad defaults file at startup rather than on first connection
    if let Err(e) = config.defaults.build() {
        error!("Invalid flow valve defaults: {}", e);
        std::process::exit(2);
    }

    let shared_state = Arc::new(AppState {
        defaults: config.defaults,
    });

    let app = Router::new()
        .route("/", get(root))
        .route("/api/fields", get(fields))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    info!("listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await
}

async fn root() -> String {
    format!("Flow valve command host {}", flow_valve_core::version())
}

/// Dialog rows for a fresh command, so a client can lay out the form
/// before connecting.
async fn fields(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.defaults.build() {
        Ok(spec) => Json(dialog_fields(&spec)).into_response(),
        Err(e) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// One connection is one command invocation. The session lives exactly as
/// long as the socket.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut session = match CommandSession::new(&state.defaults) {
        Ok(session) => session,
        Err(e) => {
            warn!("Could not start command session: {}", e);
            let _ = sender
                .send(Message::Text(protocol::format_error(e.code(), &e.to_string(), "error")))
                .await;
            return;
        }
    };
    info!("Client connected, session {}", session.id());

    if sender
        .send(Message::Text(protocol::session_start(&session)))
        .await
        .is_err()
    {
        return;
    }

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Socket error in session {}: {}", session.id(), e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                info!("Received message: {}", text);
                for reply in protocol::handle_message(&mut session, &text) {
                    if sender.send(Message::Text(reply)).await.is_err() {
                        return;
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("Client disconnected, ending session {}", session.id());
}
