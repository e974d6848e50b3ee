//! Pure turn transition function
//!
//! Given the current state, the committed path, the tree and one event,
//! produce the next state plus the effects to execute. No I/O happens here;
//! given the same inputs this function always produces the same outputs.

use super::{Effect, TurnEvent, TurnState, ROOT_CARD, TEXT_INPUT_CARD};
use crate::resolver::{resolve_next, Outcome};
use crate::tree::CategoryTree;

/// Confirmation shown after a submission, regardless of delivery outcome.
pub const CONFIRMATION_TEXT: &str =
    "✅ Thanks — your request has been submitted successfully.\n\nOur support team will follow up shortly.";

/// Reply for a selection that no longer resolves against the current path.
pub const STALE_SELECTION_TEXT: &str =
    "Sorry, that option isn't available right now. Please start again from the menu.";

/// Result of a turn transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: TurnState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    fn new(state: TurnState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function.
///
/// `path` is the committed path *before* this event; a selection being
/// resolved is never part of the path handed to the resolver. Appending is
/// itself an effect, applied by the runtime only for selections the
/// resolver accepted.
pub fn transition(
    state: TurnState,
    path: &[String],
    tree: &CategoryTree,
    event: TurnEvent,
) -> TransitionResult {
    match event {
        // A join renders the root menu unconditionally, independent of any
        // prior state. Path and state are left untouched.
        TurnEvent::Joined => TransitionResult::new(state)
            .with_effect(Effect::ShowCard(ROOT_CARD.to_string())),

        // Selections are honored in either state: buttons on an older card
        // can be pressed at any time, and the resolver decides whether they
        // still make sense against the committed path.
        TurnEvent::Selection(label) => match resolve_next(tree, path, &label) {
            Outcome::Submenu { card } => TransitionResult::new(TurnState::AwaitingSelection)
                .with_effect(Effect::AppendStep(label))
                .with_effect(Effect::ShowCard(card)),

            Outcome::FreeText => TransitionResult::new(TurnState::AwaitingFreeText)
                .with_effect(Effect::AppendStep(label))
                .with_effect(Effect::ShowCard(TEXT_INPUT_CARD.to_string())),

            Outcome::MissingTemplate => {
                tracing::warn!(
                    path = ?path,
                    selection = %label,
                    "branch has children but no card template; degrading to free text"
                );
                TransitionResult::new(TurnState::AwaitingFreeText)
                    .with_effect(Effect::AppendStep(label))
                    .with_effect(Effect::ShowCard(TEXT_INPUT_CARD.to_string()))
            }

            // Stale or malformed selection. The step is NOT appended, so
            // the committed path stays reachable in the tree; the turn ends
            // without state progression.
            Outcome::NotFound => {
                tracing::warn!(
                    path = ?path,
                    selection = %label,
                    "selection does not resolve against current path"
                );
                TransitionResult::new(state)
                    .with_effect(Effect::SendText(STALE_SELECTION_TEXT.to_string()))
            }
        },

        // Free text completes the cycle: dispatch, confirm, reset. Accepted
        // in either state, mirroring the transport which forwards any
        // description it receives.
        TurnEvent::Description(text) => TransitionResult::new(TurnState::AwaitingSelection)
            .with_effect(Effect::Dispatch {
                path: path.to_vec(),
                description: text,
            })
            .with_effect(Effect::SendText(CONFIRMATION_TEXT.to_string()))
            .with_effect(Effect::ResetPath),
    }
}
