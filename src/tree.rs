//! Category tree: the static hierarchy of support categories
//!
//! Pure data plus lookup. The tree is built once at startup and never
//! modified; all navigation decisions are derived from it by the resolver.

/// A node in the category tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Terminal category. Selecting it ends navigation and asks for a
    /// free-text description.
    Leaf,

    /// Category with sub-categories. `card` names the adaptive-card
    /// template used to present the children.
    Branch {
        card: Option<String>,
        /// Ordered label -> child mapping. Order is preserved because it
        /// drives button order on the rendered card.
        children: Vec<(String, Node)>,
    },
}

impl Node {
    /// Child lookup by label. Trees are small, linear scan is fine.
    pub fn child(&self, label: &str) -> Option<&Node> {
        match self {
            Node::Leaf => None,
            Node::Branch { children, .. } => children
                .iter()
                .find(|(name, _)| name == label)
                .map(|(_, node)| node),
        }
    }

    pub fn children(&self) -> &[(String, Node)] {
        match self {
            Node::Leaf => &[],
            Node::Branch { children, .. } => children,
        }
    }

    pub fn card(&self) -> Option<&str> {
        match self {
            Node::Leaf => None,
            Node::Branch { card, .. } => card.as_deref(),
        }
    }
}

/// Immutable rooted category tree
#[derive(Debug, Clone)]
pub struct CategoryTree {
    root: Node,
}

impl CategoryTree {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Walk from the root, consuming one label per step.
    ///
    /// Returns `None` if any step's label is absent among the current
    /// node's children, including steps attempted past a leaf. The empty
    /// path resolves to the root itself.
    pub fn lookup(&self, path: &[String]) -> Option<&Node> {
        let mut current = &self.root;
        for step in path {
            current = current.child(step)?;
        }
        Some(current)
    }
}

fn leaf(label: &str) -> (String, Node) {
    (label.to_string(), Node::Leaf)
}

fn branch(label: &str, card: &str, children: Vec<(String, Node)>) -> (String, Node) {
    (
        label.to_string(),
        Node::Branch {
            card: Some(card.to_string()),
            children,
        },
    )
}

/// The production support-category tree.
///
/// Single source of truth for all support categories. Labels are what the
/// user sees on card buttons and what ends up in the submitted path.
pub fn support_tree() -> CategoryTree {
    CategoryTree::new(Node::Branch {
        card: Some("categories".to_string()),
        children: vec![
            branch(
                "Salesforce",
                "salesforce",
                vec![
                    branch(
                        "Access / Login",
                        "salesforce-access",
                        vec![leaf("Cannot login"), leaf("Missing sections")],
                    ),
                    leaf("Errors"),
                    leaf("Modifications"),
                    leaf("Reports"),
                    leaf("Flows"),
                    leaf("Integrations"),
                ],
            ),
            branch(
                "Hardware",
                "hardware",
                vec![
                    leaf("Printers"),
                    branch(
                        "Laptop/Desktop",
                        "hardware-laptop",
                        vec![leaf("Login"), leaf("Hardware")],
                    ),
                ],
            ),
            leaf("Network / Internet"),
            branch(
                "Onboarding & Email",
                "onboarding",
                vec![leaf("New member signup"), leaf("Email access")],
            ),
            branch(
                "Office Software",
                "office-software",
                vec![leaf("OneDrive"), leaf("Word / Excel")],
            ),
            branch(
                "Telephone",
                "telephone",
                vec![
                    leaf("New User"),
                    leaf("Login"),
                    branch(
                        "Installation",
                        "telephone-installation",
                        vec![leaf("iOS"), leaf("Android"), leaf("Windows")],
                    ),
                    branch(
                        "Connection",
                        "telephone-connection",
                        vec![leaf("Calls"), leaf("SMS")],
                    ),
                ],
            ),
            leaf("Security"),
            leaf("Other"),
        ],
    })
}
