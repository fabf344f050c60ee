use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Document, Node};

/// What an element may keep when saved content is cleaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub style: bool,
}

/// Allow-list keyed by lower-case tag name. Serializes to the
/// `{ "mark": { "class": "...", "style": true } }` shape hosts consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SanitizeConfig {
    rules: BTreeMap<String, SanitizeRule>,
}

impl SanitizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, tag: &str, rule: SanitizeRule) -> Self {
        self.rules.insert(tag.to_ascii_lowercase(), rule);
        self
    }

    pub fn rule(&self, tag: &str) -> Option<&SanitizeRule> {
        self.rules.get(&tag.to_ascii_lowercase())
    }

    /// Later rules for the same tag replace earlier ones.
    pub fn merge(&mut self, other: SanitizeConfig) {
        self.rules.extend(other.rules);
    }

    /// Cleans the inline content of every top-level block. Allowed elements
    /// keep only the permitted class and, when permitted, their style;
    /// elements with no rule are replaced by their cleaned children.
    pub fn clean(&self, doc: &Document) -> Document {
        let children = doc
            .children
            .iter()
            .map(|block| match block {
                Node::Element(el) => Node::Element(
                    el.shallow_clone()
                        .with_children(self.clean_inline(&el.children)),
                ),
                Node::Text(_) => block.clone(),
            })
            .collect();
        Document { children }
    }

    pub fn clean_inline(&self, nodes: &[Node]) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Text(_) => out.push(node.clone()),
                Node::Element(el) => {
                    let children = self.clean_inline(&el.children);
                    let Some(rule) = self.rule(&el.tag) else {
                        out.extend(children);
                        continue;
                    };
                    let mut kept = el.shallow_clone().with_children(children);
                    kept.classes
                        .retain(|c| rule.class.as_deref() == Some(c.as_str()));
                    if !rule.style {
                        kept.style.clear();
                    }
                    out.push(Node::Element(kept));
                }
            }
        }
        out
    }
}
