//! Per-conversation turn state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the transition function decides, effects are data, and the session
//! runtime executes them.

mod effect;
mod event;
mod state;
mod transition;

pub use effect::Effect;
pub use event::TurnEvent;
pub use state::{ConversationPath, TurnState};
pub use transition::{transition, TransitionResult};

/// Template id of the root categories card.
pub const ROOT_CARD: &str = "categories";

/// Template id of the free-text description card.
pub const TEXT_INPUT_CARD: &str = "text-input";
