//! Effects produced by turn transitions
//!
//! Effects are plain data. The session runtime applies the state effects
//! (`AppendStep`, `ResetPath`) to the conversation it owns and executes the
//! I/O effects through the replier and submission-sink seams.

/// Effects to be executed after a turn transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a resolver-validated selection to the conversation path.
    AppendStep(String),

    /// Clear the conversation path back to empty.
    ResetPath,

    /// Render the card registered under this template id.
    ShowCard(String),

    /// Send a plain-text reply.
    SendText(String),

    /// Assemble a submission record from the completed path and hand it to
    /// the delivery collaborator.
    Dispatch {
        path: Vec<String>,
        description: String,
    },
}
