//! Path resolution: classify one selection against the category tree
//!
//! This is the single authoritative place the "what happens next" decision
//! is made. Everything else (the turn state machine, the card layer)
//! consumes the `Outcome` produced here and must not re-derive it.

use crate::tree::{CategoryTree, Node};

/// Classification of one selection appended to a prior path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The selection lands on a branch with children and an explicit card
    /// template. Navigation continues by showing that card.
    Submenu { card: String },

    /// The selection lands on a leaf (or a childless branch, which routes
    /// the same way). Navigation ends; ask for a free-text description.
    FreeText,

    /// The selection lands on a branch with children but no card template.
    /// A data-integrity gap in the tree definition, not a navigation error.
    /// Callers degrade it to the free-text prompt after logging it.
    MissingTemplate,

    /// The computed path does not resolve in the tree. A state-corruption
    /// signal for the caller, never silently absorbed.
    NotFound,
}

/// Resolve `prior_path + [selection]` against the tree and classify it.
///
/// Pure: identical arguments always yield an identical `Outcome`.
pub fn resolve_next(tree: &CategoryTree, prior_path: &[String], selection: &str) -> Outcome {
    let mut full_path: Vec<String> = prior_path.to_vec();
    full_path.push(selection.to_string());

    match tree.lookup(&full_path) {
        None => Outcome::NotFound,
        Some(Node::Leaf) => Outcome::FreeText,
        Some(node) if node.children().is_empty() => Outcome::FreeText,
        Some(node) => match node.card() {
            Some(card) => Outcome::Submenu {
                card: card.to_string(),
            },
            None => Outcome::MissingTemplate,
        },
    }
}
