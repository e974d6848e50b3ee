//! HTTP surface: the message endpoint the channel posts activities to

use crate::sessions::SessionManager;
use crate::transport::{Activity, ConnectorClient};
use crate::webhook::WebhookClient;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

pub type Sessions = SessionManager<ConnectorClient, WebhookClient>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Sessions>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/messages", post(messages))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// One incoming turn. Always answers 200: every failure inside the turn is
/// turn-scoped and already logged, and the channel retries on anything else.
async fn messages(State(state): State<AppState>, Json(activity): Json<Activity>) -> StatusCode {
    let Some(conversation) = activity.conversation_ref() else {
        tracing::debug!(kind = %activity.kind, "activity without conversation ignored");
        return StatusCode::OK;
    };

    if activity.member_left() {
        state.sessions.evict(&conversation.id).await;
    }

    for event in activity.events() {
        state.sessions.handle_turn(&conversation, event).await;
    }

    StatusCode::OK
}

async fn healthz() -> &'static str {
    "ok"
}
