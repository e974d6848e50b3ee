//! Bot Framework transport binding
//!
//! Thin plumbing around the navigation core: parses incoming activities
//! into turn events and posts reply activities (cards, plain text) back to
//! the channel's service URL. Reply failures are logged, never propagated
//! into the turn.

use crate::state_machine::TurnEvent;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

const LOGIN_URL: &str = "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
const TOKEN_SCOPE: &str = "https://api.botframework.com/.default";
const CONNECTOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport-level failures
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned {status}")]
    Token { status: StatusCode },

    #[error("channel returned {status}")]
    Channel { status: StatusCode },

    #[error("activity carries no serviceUrl to reply to")]
    MissingServiceUrl,
}

// ============================================================
// Incoming activities
// ============================================================

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ChannelAccount {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ConversationAccount {
    pub id: String,
}

/// Card submit payload: either a button press or the free-text form.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SubmitValue {
    pub selection: Option<String>,
    pub description: Option<String>,
}

/// Incoming turn activity, Bot Framework shape
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    pub members_added: Vec<ChannelAccount>,
    pub members_removed: Vec<ChannelAccount>,
    pub recipient: Option<ChannelAccount>,
    pub conversation: Option<ConversationAccount>,
    pub service_url: Option<String>,
    pub value: Option<SubmitValue>,
}

/// Where replies for one turn go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRef {
    pub id: String,
    pub service_url: Option<String>,
}

impl Activity {
    /// Extract the core events this activity carries, in order.
    ///
    /// A join is reported once per added member that is not the bot itself.
    /// A message may carry both a selection and a description; both are
    /// yielded, selection first. Anything else is ignored.
    pub fn events(&self) -> Vec<TurnEvent> {
        match self.kind.as_str() {
            "conversationUpdate" => {
                let bot_id = self.recipient.as_ref().map(|r| r.id.as_str());
                self.members_added
                    .iter()
                    .filter(|m| Some(m.id.as_str()) != bot_id)
                    .map(|_| TurnEvent::Joined)
                    .collect()
            }
            "message" => {
                let mut events = Vec::new();
                if let Some(value) = &self.value {
                    if let Some(selection) = &value.selection {
                        events.push(TurnEvent::Selection(selection.clone()));
                    }
                    if let Some(description) = &value.description {
                        events.push(TurnEvent::Description(description.clone()));
                    }
                }
                events
            }
            _ => Vec::new(),
        }
    }

    /// True when the sender (not the bot) left the conversation.
    pub fn member_left(&self) -> bool {
        let bot_id = self.recipient.as_ref().map(|r| r.id.as_str());
        self.kind == "conversationUpdate"
            && self
                .members_removed
                .iter()
                .any(|m| Some(m.id.as_str()) != bot_id)
    }

    pub fn conversation_ref(&self) -> Option<ConversationRef> {
        Some(ConversationRef {
            id: self.conversation.as_ref()?.id.clone(),
            service_url: self.service_url.clone(),
        })
    }
}

// ============================================================
// Outgoing replies
// ============================================================

/// Seam toward the channel for one turn's replies
#[async_trait]
pub trait TurnReplier: Send + Sync {
    async fn send_card(&self, conversation: &ConversationRef, card: &Value);
    async fn send_text(&self, conversation: &ConversationRef, text: &str);
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Client-credentials token for the Bot Framework connector, cached until
/// near expiry.
struct TokenProvider {
    http: reqwest::Client,
    app_id: String,
    app_password: String,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    fn new(http: reqwest::Client, app_id: String, app_password: String) -> Self {
        Self {
            http,
            app_id,
            app_password,
            cached: RwLock::new(None),
        }
    }

    async fn bearer(&self) -> Result<String, TransportError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() {
                    return Ok(token.token.clone());
                }
            }
        }

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.app_id.as_str()),
            ("client_secret", self.app_password.as_str()),
            ("scope", TOKEN_SCOPE),
        ];
        let res = self.http.post(LOGIN_URL).form(&form).send().await?;
        if !res.status().is_success() {
            return Err(TransportError::Token {
                status: res.status(),
            });
        }
        let token: TokenResponse = res.json().await?;

        // Refresh one minute before the channel would reject us.
        let ttl = Duration::from_secs(token.expires_in.saturating_sub(60));
        let mut cached = self.cached.write().await;
        *cached = Some(CachedToken {
            token: token.access_token.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(token.access_token)
    }
}

/// Production replier: POSTs reply activities to the incoming activity's
/// service URL. Without configured credentials requests go out
/// unauthenticated (local emulator mode).
pub struct ConnectorClient {
    http: reqwest::Client,
    auth: Option<TokenProvider>,
}

impl ConnectorClient {
    pub fn new(app_id: Option<String>, app_password: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(CONNECTOR_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        let auth = match (app_id, app_password) {
            (Some(id), Some(password)) => Some(TokenProvider::new(http.clone(), id, password)),
            _ => None,
        };
        Self { http, auth }
    }

    async fn send_activity(
        &self,
        conversation: &ConversationRef,
        body: Value,
    ) -> Result<(), TransportError> {
        let service_url = conversation
            .service_url
            .as_deref()
            .ok_or(TransportError::MissingServiceUrl)?;
        let url = format!(
            "{}/v3/conversations/{}/activities",
            service_url.trim_end_matches('/'),
            conversation.id
        );

        let mut request = self.http.post(&url).json(&body);
        if let Some(auth) = &self.auth {
            request = request.bearer_auth(auth.bearer().await?);
        }

        let res = request.send().await?;
        if !res.status().is_success() {
            return Err(TransportError::Channel {
                status: res.status(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TurnReplier for ConnectorClient {
    async fn send_card(&self, conversation: &ConversationRef, card: &Value) {
        let body = json!({
            "type": "message",
            "attachments": [{
                "contentType": "application/vnd.microsoft.card.adaptive",
                "content": card
            }]
        });
        if let Err(err) = self.send_activity(conversation, body).await {
            tracing::error!(conversation = %conversation.id, error = %err, "failed to send card");
        }
    }

    async fn send_text(&self, conversation: &ConversationRef, text: &str) {
        let body = json!({ "type": "message", "text": text });
        if let Err(err) = self.send_activity(conversation, body).await {
            tracing::error!(conversation = %conversation.id, error = %err, "failed to send text");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Activity {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn join_yields_one_event_per_non_bot_member() {
        let activity = parse(
            r#"{
                "type": "conversationUpdate",
                "membersAdded": [{"id": "bot-1"}, {"id": "user-1"}, {"id": "user-2"}],
                "recipient": {"id": "bot-1"},
                "conversation": {"id": "conv-1"},
                "serviceUrl": "https://smba.example.com/emea/"
            }"#,
        );
        assert_eq!(activity.events(), vec![TurnEvent::Joined, TurnEvent::Joined]);
        assert!(!activity.member_left());
    }

    #[test]
    fn bot_joining_alone_yields_nothing() {
        let activity = parse(
            r#"{
                "type": "conversationUpdate",
                "membersAdded": [{"id": "bot-1"}],
                "recipient": {"id": "bot-1"},
                "conversation": {"id": "conv-1"}
            }"#,
        );
        assert!(activity.events().is_empty());
    }

    #[test]
    fn selection_message_maps_to_selection_event() {
        let activity = parse(
            r#"{
                "type": "message",
                "conversation": {"id": "conv-1"},
                "value": {"selection": "Hardware"}
            }"#,
        );
        assert_eq!(
            activity.events(),
            vec![TurnEvent::Selection("Hardware".to_string())]
        );
    }

    #[test]
    fn message_with_selection_and_description_yields_both_in_order() {
        let activity = parse(
            r#"{
                "type": "message",
                "conversation": {"id": "conv-1"},
                "value": {"selection": "Security", "description": "locked out"}
            }"#,
        );
        assert_eq!(
            activity.events(),
            vec![
                TurnEvent::Selection("Security".to_string()),
                TurnEvent::Description("locked out".to_string())
            ]
        );
    }

    #[test]
    fn plain_text_message_and_unknown_types_are_ignored() {
        let plain = parse(r#"{"type": "message", "conversation": {"id": "c"}}"#);
        assert!(plain.events().is_empty());

        let typing = parse(r#"{"type": "typing", "conversation": {"id": "c"}}"#);
        assert!(typing.events().is_empty());
    }

    #[test]
    fn member_leaving_is_detected() {
        let activity = parse(
            r#"{
                "type": "conversationUpdate",
                "membersRemoved": [{"id": "user-1"}],
                "recipient": {"id": "bot-1"},
                "conversation": {"id": "conv-1"}
            }"#,
        );
        assert!(activity.member_left());
        assert!(activity.events().is_empty());
    }

    #[test]
    fn conversation_ref_carries_the_service_url() {
        let activity = parse(
            r#"{
                "type": "message",
                "conversation": {"id": "conv-9"},
                "serviceUrl": "https://smba.example.com/emea/"
            }"#,
        );
        let conv = activity.conversation_ref().unwrap();
        assert_eq!(conv.id, "conv-9");
        assert_eq!(
            conv.service_url.as_deref(),
            Some("https://smba.example.com/emea/")
        );
    }
}
