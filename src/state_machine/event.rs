//! Events that trigger turn transitions

/// One user-originated event, already extracted from the transport shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// A new participant joined the conversation.
    Joined,

    /// A card button was pressed; carries the selection label.
    Selection(String),

    /// The free-text description was submitted.
    Description(String),
}
