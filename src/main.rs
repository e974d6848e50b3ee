//! Helpdesk triage bot
//!
//! Walks users through a fixed support-category tree one card at a time,
//! collects a free-text description at the leaves, and forwards the
//! completed submission to a webhook collector.

mod api;
mod cards;
mod config;
mod resolver;
mod sessions;
mod state_machine;
mod transport;
mod tree;
mod webhook;

use api::{create_router, AppState};
use cards::CardRegistry;
use config::Config;
use sessions::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::ConnectorClient;
use webhook::WebhookClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helpdesk_bot=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env();

    // Tree and cards are validated together before the first turn; a
    // branch without a resolvable template fails startup here.
    let tree = tree::support_tree();
    let registry = CardRegistry::from_tree(&tree)?;

    if config.webhook_url.is_none() {
        tracing::warn!("WEBHOOK_URL not configured; submissions will be logged only");
    }
    let sink = WebhookClient::new(config.webhook_url.clone());
    let replier = ConnectorClient::new(config.app_id.clone(), config.app_password.clone());

    let state = AppState {
        sessions: Arc::new(SessionManager::new(tree, registry, replier, sink)),
    };
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("helpdesk bot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
