//! Keyed per-conversation sessions
//!
//! One owned session (turn state + path) per conversation id. The map gives
//! cross-conversation isolation; the per-session mutex serializes turns
//! within one conversation, since the path is not safe for concurrent
//! writers.

use crate::cards::CardRegistry;
use crate::state_machine::{transition, ConversationPath, Effect, TurnEvent, TurnState};
use crate::transport::{ConversationRef, TurnReplier};
use crate::tree::CategoryTree;
use crate::webhook::{SubmissionRecord, SubmissionSink};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Default)]
struct Session {
    state: TurnState,
    path: ConversationPath,
}

/// Manager for all conversation sessions
pub struct SessionManager<R, S> {
    tree: CategoryTree,
    cards: CardRegistry,
    replier: R,
    sink: S,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl<R: TurnReplier, S: SubmissionSink> SessionManager<R, S> {
    pub fn new(tree: CategoryTree, cards: CardRegistry, replier: R, sink: S) -> Self {
        Self {
            tree,
            cards,
            replier,
            sink,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    async fn get_or_create(&self, conversation_id: &str) -> Arc<Mutex<Session>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(conversation_id) {
                return session.clone();
            }
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(conversation_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop a conversation's session (member left).
    pub async fn evict(&self, conversation_id: &str) {
        if self.sessions.write().await.remove(conversation_id).is_some() {
            tracing::info!(conversation = %conversation_id, "session evicted");
        }
    }

    /// Process one turn: run the pure transition, then execute its effects.
    ///
    /// Holds the session lock for the whole turn, so turns for the same
    /// conversation never overlap.
    pub async fn handle_turn(&self, conversation: &ConversationRef, event: TurnEvent) {
        let session = self.get_or_create(&conversation.id).await;
        let mut session = session.lock().await;

        tracing::debug!(
            conversation = %conversation.id,
            state = ?session.state,
            event = ?event,
            "processing turn"
        );

        let result = transition(session.state, session.path.current(), &self.tree, event);
        session.state = result.new_state;

        for effect in result.effects {
            match effect {
                Effect::AppendStep(label) => session.path.append(label),
                Effect::ResetPath => session.path.reset(),
                Effect::ShowCard(id) => {
                    // Startup validation makes this lookup infallible for
                    // the production tree; if it ever misses, the prompt
                    // degrades to free text rather than killing the turn.
                    let card = match self.cards.get(&id) {
                        Some(card) => card,
                        None => {
                            tracing::error!(
                                conversation = %conversation.id,
                                template = %id,
                                "card template failed to resolve"
                            );
                            self.cards.text_input()
                        }
                    };
                    self.replier.send_card(conversation, card).await;
                }
                Effect::SendText(text) => self.replier.send_text(conversation, &text).await,
                Effect::Dispatch { path, description } => {
                    let record = SubmissionRecord::new(path, description);
                    let outcome = self.sink.submit(&record).await;
                    tracing::info!(
                        conversation = %conversation.id,
                        outcome = ?outcome,
                        "submission dispatched"
                    );
                }
            }
        }
    }
}
