//! Turn state and the per-conversation selection path

/// Where a conversation is within one navigation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// Ready for a menu selection. Initial state, re-entered after every
    /// submenu and after each completed submission.
    #[default]
    AwaitingSelection,

    /// Navigation reached a terminal node; waiting for the free-text
    /// description.
    AwaitingFreeText,
}

/// Ordered sequence of selection labels from the tree root to the current
/// position. Owned by exactly one conversation.
///
/// No tree validation happens here. The transition function only emits
/// append effects for selections the resolver has already classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationPath {
    steps: Vec<String>,
}

impl ConversationPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, label: impl Into<String>) {
        self.steps.push(label.into());
    }

    pub fn current(&self) -> &[String] {
        &self.steps
    }

    pub fn reset(&mut self) {
        self.steps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn append_preserves_order() {
        let mut path = ConversationPath::new();
        path.append("Hardware");
        path.append("Printers");
        assert_eq!(path.current(), ["Hardware", "Printers"]);
    }

    proptest! {
        // Path-append law: after append(x), current() is the previous
        // sequence with x as the final element.
        #[test]
        fn append_law(steps in proptest::collection::vec(".{0,12}", 0..8), last in ".{0,12}") {
            let mut path = ConversationPath::new();
            for step in &steps {
                path.append(step.clone());
            }
            let before = path.current().to_vec();
            path.append(last.clone());
            let mut expected = before;
            expected.push(last);
            prop_assert_eq!(path.current(), expected.as_slice());
        }

        // Reset idempotence: reset() then current() is always empty,
        // regardless of prior path length or repeated resets.
        #[test]
        fn reset_law(steps in proptest::collection::vec(".{0,12}", 0..8)) {
            let mut path = ConversationPath::new();
            for step in steps {
                path.append(step);
            }
            path.reset();
            prop_assert!(path.current().is_empty());
            path.reset();
            prop_assert!(path.current().is_empty());
        }
    }
}
