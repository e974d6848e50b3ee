//! Adaptive-card registry
//!
//! Immutable mapping from template id to card payload, generated from the
//! category tree and validated fully at startup: a branch that needs a
//! deeper prompt but has no resolvable template is caught here, before
//! first use, not at first navigation to that node.

use crate::state_machine::{ROOT_CARD, TEXT_INPUT_CARD};
use crate::tree::{CategoryTree, Node};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Data-integrity errors in the tree/template configuration
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("branch at {path:?} has children but no card template")]
    MissingTemplate { path: Vec<String> },

    #[error("card template id {id:?} is used by more than one branch")]
    DuplicateTemplate { id: String },
}

/// Immutable template id -> adaptive card payload mapping
#[derive(Debug, Clone)]
pub struct CardRegistry {
    cards: HashMap<String, Value>,
}

impl CardRegistry {
    /// Generate and validate the full registry for a tree.
    pub fn from_tree(tree: &CategoryTree) -> Result<Self, RegistryError> {
        let mut cards = HashMap::new();
        cards.insert(TEXT_INPUT_CARD.to_string(), text_input_card());
        cards.insert(
            ROOT_CARD.to_string(),
            menu_card("👋 How can we help? Pick a category:", tree.root()),
        );

        let mut path = Vec::new();
        collect_branch_cards(tree.root(), &mut path, &mut cards)?;

        Ok(Self { cards })
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.cards.get(id)
    }

    /// The free-text prompt card. Always present; also the degraded
    /// fallback when a template id fails to resolve at runtime.
    pub fn text_input(&self) -> &Value {
        &self.cards[TEXT_INPUT_CARD]
    }

    #[cfg(test)]
    pub fn template_ids(&self) -> Vec<&str> {
        self.cards.keys().map(String::as_str).collect()
    }
}

fn collect_branch_cards(
    node: &Node,
    path: &mut Vec<String>,
    cards: &mut HashMap<String, Value>,
) -> Result<(), RegistryError> {
    for (label, child) in node.children() {
        if child.children().is_empty() {
            continue;
        }
        path.push(label.clone());
        let Some(card_id) = child.card() else {
            return Err(RegistryError::MissingTemplate { path: path.clone() });
        };
        let rendered = menu_card(label, child);
        if cards.insert(card_id.to_string(), rendered).is_some() {
            return Err(RegistryError::DuplicateTemplate {
                id: card_id.to_string(),
            });
        }
        collect_branch_cards(child, path, cards)?;
        path.pop();
    }
    Ok(())
}

/// One submenu card: a title plus one submit action per child.
fn menu_card(title: &str, node: &Node) -> Value {
    let actions: Vec<Value> = node
        .children()
        .iter()
        .map(|(label, _)| {
            json!({
                "type": "Action.Submit",
                "title": label,
                "data": { "selection": label }
            })
        })
        .collect();

    json!({
        "type": "AdaptiveCard",
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "version": "1.4",
        "body": [{
            "type": "TextBlock",
            "text": title,
            "weight": "Bolder",
            "size": "Medium",
            "wrap": true
        }],
        "actions": actions
    })
}

fn text_input_card() -> Value {
    json!({
        "type": "AdaptiveCard",
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "version": "1.4",
        "body": [
            {
                "type": "TextBlock",
                "text": "Tell us a bit more about the issue:",
                "wrap": true
            },
            {
                "type": "Input.Text",
                "id": "description",
                "isMultiline": true,
                "placeholder": "Describe the problem..."
            }
        ],
        "actions": [{
            "type": "Action.Submit",
            "title": "Submit"
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::support_tree;

    #[test]
    fn production_tree_validates_and_covers_every_branch() {
        let registry = CardRegistry::from_tree(&support_tree()).unwrap();
        for id in [
            ROOT_CARD,
            TEXT_INPUT_CARD,
            "salesforce",
            "salesforce-access",
            "hardware",
            "hardware-laptop",
            "onboarding",
            "office-software",
            "telephone",
            "telephone-installation",
            "telephone-connection",
        ] {
            assert!(registry.get(id).is_some(), "missing template {id}");
        }
        assert_eq!(registry.template_ids().len(), 11);
    }

    #[test]
    fn menu_card_actions_follow_child_order() {
        let registry = CardRegistry::from_tree(&support_tree()).unwrap();
        let card = registry.get("hardware").unwrap();
        let titles: Vec<&str> = card["actions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Printers", "Laptop/Desktop"]);
        assert_eq!(
            card["actions"][0]["data"]["selection"].as_str(),
            Some("Printers")
        );
    }

    #[test]
    fn text_input_card_carries_the_description_field() {
        let registry = CardRegistry::from_tree(&support_tree()).unwrap();
        let card = registry.text_input();
        let input = &card["body"][1];
        assert_eq!(input["type"].as_str(), Some("Input.Text"));
        assert_eq!(input["id"].as_str(), Some("description"));
        assert_eq!(input["isMultiline"].as_bool(), Some(true));
    }

    #[test]
    fn branch_without_template_fails_validation() {
        let tree = CategoryTree::new(Node::Branch {
            card: Some("root".to_string()),
            children: vec![(
                "Broken".to_string(),
                Node::Branch {
                    card: None,
                    children: vec![("Child".to_string(), Node::Leaf)],
                },
            )],
        });
        let err = CardRegistry::from_tree(&tree).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingTemplate { path } if path == vec!["Broken".to_string()]
        ));
    }

    #[test]
    fn duplicate_template_ids_fail_validation() {
        let sub = Node::Branch {
            card: Some("dup".to_string()),
            children: vec![("X".to_string(), Node::Leaf)],
        };
        let tree = CategoryTree::new(Node::Branch {
            card: Some("root".to_string()),
            children: vec![("A".to_string(), sub.clone()), ("B".to_string(), sub)],
        });
        let err = CardRegistry::from_tree(&tree).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTemplate { id } if id == "dup"));
    }
}
