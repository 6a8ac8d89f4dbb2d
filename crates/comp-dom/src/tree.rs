//! JSON document trees and markup serialization
//!
//! A tree is a nested [`ElementSpec`]; bare JSON strings are text nodes.
//!
//! ```json
//! {"tag": "div", "classes": ["a"], "children": [{"tag": "span", "classes": ["b"]}, "hi"]}
//! ```

use crate::document::{Document, NodeKind};
use crate::error::DomError;
use crate::marker::UPGRADED_ATTRIBUTE;
use crate::node::NodeId;
use crate::HostCapabilities;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Serialized node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// Text node
    Text(String),
    /// Element subtree
    Element(ElementSpec),
}

/// Serialized element subtree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Tag name
    pub tag: String,
    /// Class list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Other attributes, `data-upgraded` included
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    /// Child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl ElementSpec {
    /// Element with tag only
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add a child element
    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(NodeSpec::Element(child));
        self
    }

    /// Add a text child
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(NodeSpec::Text(text.into()));
        self
    }
}

impl Document {
    /// Build a document whose document element is described by `spec`
    ///
    /// The document element is always `<html>`. An `html` spec decorates it;
    /// any other spec is appended as its only child.
    ///
    /// # Errors
    /// Propagates errors from building the subtree.
    pub fn from_tree(spec: &ElementSpec, capabilities: HostCapabilities) -> Result<Self, DomError> {
        let mut doc = Self::with_capabilities(capabilities);
        let root = doc.root();
        if spec.tag.eq_ignore_ascii_case("html") {
            doc.apply_element_spec(root, spec)?;
            for child in &spec.children {
                doc.append_tree(root, child)?;
            }
        } else {
            doc.append_tree(root, &NodeSpec::Element(spec.clone()))?;
        }
        Ok(doc)
    }

    /// Parse a JSON tree and build a document from it
    ///
    /// # Errors
    /// Returns [`DomError::InvalidTree`] for malformed JSON.
    pub fn from_json(json: &str, capabilities: HostCapabilities) -> Result<Self, DomError> {
        let spec: ElementSpec =
            serde_json::from_str(json).map_err(|e| DomError::InvalidTree(e.to_string()))?;
        Self::from_tree(&spec, capabilities)
    }

    /// Build `spec` and append it under `parent`; returns the new node
    ///
    /// # Errors
    /// Fails if `parent` is not an element of this document.
    pub fn append_tree(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId, DomError> {
        let id = match spec {
            NodeSpec::Text(text) => self.create_text_node(text),
            NodeSpec::Element(element) => {
                let id = self.create_element(&element.tag);
                self.apply_element_spec(id, element)?;
                for child in &element.children {
                    self.append_tree(id, child)?;
                }
                id
            }
        };
        self.append_child(parent, id)
    }

    fn apply_element_spec(&mut self, id: NodeId, spec: &ElementSpec) -> Result<(), DomError> {
        for class in &spec.classes {
            self.add_class(id, class)?;
        }
        for (name, value) in &spec.attributes {
            if name == "class" {
                for class in value.split_whitespace() {
                    self.add_class(id, class)?;
                }
            } else {
                self.set_attribute(id, name, value)?;
            }
        }
        Ok(())
    }

    /// Snapshot a subtree back into spec form
    #[must_use]
    pub fn to_tree(&self, id: NodeId) -> Option<NodeSpec> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(NodeSpec::Text(text.clone())),
            NodeKind::Element(data) => {
                let mut attributes = data.attributes.clone();
                if !data.marker.is_empty() {
                    attributes.insert(UPGRADED_ATTRIBUTE.to_owned(), data.marker.to_attribute());
                }
                Some(NodeSpec::Element(ElementSpec {
                    tag: data.tag.clone(),
                    classes: data.classes.iter().cloned().collect(),
                    attributes,
                    children: self
                        .child_nodes(id)
                        .iter()
                        .filter_map(|c| self.to_tree(c))
                        .collect(),
                }))
            }
        }
    }

    /// Serialize a subtree as markup
    ///
    /// Attribute order: `class`, other attributes in insertion order, then
    /// `data-upgraded`.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            None => {}
            Some(NodeKind::Text(text)) => out.push_str(&escape(text, false)),
            Some(NodeKind::Element(data)) => {
                let _ = write!(out, "<{}", data.tag);
                if let Some(class) = self.attribute(id, "class") {
                    let _ = write!(out, " class=\"{}\"", escape(&class, true));
                }
                for (name, value) in &data.attributes {
                    let _ = write!(out, " {name}=\"{}\"", escape(value, true));
                }
                if !data.marker.is_empty() {
                    let _ = write!(
                        out,
                        " {UPGRADED_ATTRIBUTE}=\"{}\"",
                        escape(&data.marker.to_attribute(), true)
                    );
                }
                out.push('>');
                for child in self.child_nodes(id) {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{}>", data.tag);
            }
        }
    }
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
