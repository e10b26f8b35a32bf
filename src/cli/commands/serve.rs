//! HTTP server for the browser chat widget.
//!
//! Serves a small single-page widget and a REST API with per-session
//! conversation state.

use crate::agent::{RunItem, Runner, Session};
use crate::airline;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::llm::OpenAiModel;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    runner: Runner,
    sessions: RwLock<HashMap<String, Session>>,
}

/// Run the web chat server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    model: Option<String>,
    settings: Settings,
) -> anyhow::Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'skydesk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let model = model.unwrap_or_else(|| settings.agent.model.clone());
    let client = Arc::new(OpenAiModel::new(&settings, &model)?);
    let team = airline::support_team(&settings.prompts)?;
    let runner = Runner::new(client, team).with_max_turns(settings.agent.max_turns);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let state = Arc::new(AppState {
        runner,
        sessions: RwLock::new(HashMap::new()),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/session", post(create_session))
        .route("/api/chat", post(chat))
        .layer(cors)
        .with_state(state.clone());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Airline Customer Service");
    println!();
    Output::success(&format!("Chat widget on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Widget", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("New Session", "POST /api/session");
    Output::kv("Send Message", "POST /api/chat");
    println!();
    println!("Agents:");
    for name in state.runner.team().agent_names() {
        Output::list_item(&format!("{} {}", airline::agent_icon(name), name));
    }
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ChatRequest {
    session_id: String,
    message: String,
}

/// Session state and new chat entries, returned by both chat endpoints.
#[derive(Serialize)]
struct ChatResponse {
    session_id: String,
    /// Agent that will handle the next message.
    agent: String,
    messages: Vec<ChatEntry>,
}

/// One rendered bubble in the widget.
#[derive(Serialize)]
struct ChatEntry {
    role: String,
    agent: String,
    icon: String,
    content: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn index() -> impl IntoResponse {
    Html(include_str!("../../../static/index.html"))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = Session::new(state.runner.team());
    let agent = session.current_agent().to_string();

    let response = ChatResponse {
        session_id: session.id().to_string(),
        agent: agent.clone(),
        messages: vec![assistant_entry(agent, airline::WELCOME_MESSAGE.to_string())],
    };

    state
        .sessions
        .write()
        .await
        .insert(session.id().to_string(), session);

    Json(response)
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    // A session is checked out while its turn runs; concurrent sends see 404.
    let Some(mut session) = state.sessions.write().await.remove(&req.session_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown session: {}", req.session_id),
            }),
        )
            .into_response();
    };

    let result = state.runner.run(&mut session, &req.message).await;

    let session_id = session.id().to_string();
    let agent = session.current_agent().to_string();
    state
        .sessions
        .write()
        .await
        .insert(session_id.clone(), session);

    match result {
        Ok(turn) => Json(ChatResponse {
            session_id,
            agent,
            messages: group_items(&turn.items)
                .into_iter()
                .map(|(agent, content)| assistant_entry(agent, content))
                .collect(),
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

fn assistant_entry(agent: String, content: String) -> ChatEntry {
    ChatEntry {
        role: "assistant".to_string(),
        icon: airline::agent_icon(&agent).to_string(),
        agent,
        content,
    }
}

/// Group run items into widget entries.
///
/// Consecutive items from the same agent merge into one entry; a handoff
/// always closes the current entry and gets one of its own, attributed to
/// the agent that initiated it.
fn group_items(items: &[RunItem]) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut current: Option<String> = None;
    let mut parts: Vec<String> = Vec::new();

    for item in items {
        let (owner, text) = match item {
            RunItem::Message { agent, text } => (agent, text.clone()),
            RunItem::ToolCall { agent, .. } => (agent, "Calling a tool".to_string()),
            RunItem::ToolOutput { agent, output } => {
                (agent, format!("Tool call output: {}", output))
            }
            RunItem::Handoff { from, to } => {
                flush_group(&mut entries, &mut current, &mut parts);
                entries.push((from.clone(), format!("Handed off from {} to {}", from, to)));
                continue;
            }
        };

        if current.as_deref() != Some(owner.as_str()) {
            flush_group(&mut entries, &mut current, &mut parts);
            current = Some(owner.clone());
        }
        parts.push(text);
    }

    flush_group(&mut entries, &mut current, &mut parts);
    entries
}

fn flush_group(
    entries: &mut Vec<(String, String)>,
    current: &mut Option<String>,
    parts: &mut Vec<String>,
) {
    if let Some(agent) = current.take() {
        entries.push((agent, std::mem::take(parts).join("\n\n")));
    }
}
