//! Arena-backed host document
//!
//! Provides [`Document`]: elements and text nodes with class lists,
//! attributes, upgrade markers, and event dispatch with bubbling.

use crate::capabilities::HostCapabilities;
use crate::error::DomError;
use crate::event::{Event, EventInit, Listener, ListenerId, Registration};
use crate::marker::{UpgradeMarker, UPGRADED_ATTRIBUTE};
use crate::node::{NodeId, NodeList};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) classes: IndexSet<String>,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) marker: UpgradeMarker,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: IndexSet::new(),
            attributes: IndexMap::new(),
            marker: UpgradeMarker::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// In-memory document the component handler runs against
///
/// The document element (`<html>`) is created with the document and can never
/// be re-parented. Every other node starts detached and is attached with
/// [`append_child`](Self::append_child).
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    capabilities: HostCapabilities,
    listeners: HashMap<NodeId, Vec<Registration>>,
    next_listener: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create document on a fully capable host
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::modern())
    }

    /// Create document advertising the given host APIs
    #[must_use]
    pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
        let root = NodeData {
            kind: NodeKind::Element(ElementData::new("html")),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId::from_index(0),
            capabilities,
            listeners: HashMap::new(),
            next_listener: 0,
        }
    }

    /// Host APIs available to scripts
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// The document element
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total nodes ever created, attached or not
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ------------------------------------------------------------------
    // Tree construction
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeKind::Element(ElementData::new(tag)))
    }

    /// Create a detached text node
    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_owned()))
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    ///
    /// # Errors
    /// - [`DomError::NodeNotFound`] for foreign ids
    /// - [`DomError::NotAnElement`] if `parent` is a text node
    /// - [`DomError::HierarchyRequest`] if `child` is the document element or
    ///   an inclusive ancestor of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.element(parent)?;
        self.node(child)?;
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.nodes[old_parent.index()].children.retain(|&c| c != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(child)
    }

    /// Detach `child` from `parent`
    ///
    /// # Errors
    /// Returns [`DomError::NotAChild`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.node(parent)?;
        self.node(child)?;
        if self.nodes[child.index()].parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.nodes[parent.index()].children.retain(|&c| c != child);
        self.nodes[child.index()].parent = None;
        Ok(child)
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.index()].parent;
        }
        false
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    pub(crate) fn node(&self, id: NodeId) -> Result<&NodeData, DomError> {
        self.nodes.get(id.index()).ok_or(DomError::NodeNotFound(id))
    }

    pub(crate) fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        match &self.node(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            NodeKind::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.nodes.get_mut(id.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Element(data)) => Ok(data),
            Some(NodeKind::Text(_)) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::NodeNotFound(id)),
        }
    }

    /// Check if `id` is a node of this document
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Check if `id` is an element of this document
    #[inline]
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_ok()
    }

    /// Check if `id` is reachable from the document element
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.root, id)
    }

    /// Parent node, if attached
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    /// Lower-case tag name of an element
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|e| e.tag.as_str())
    }

    /// Text of a text node
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    /// Element children in order
    #[must_use]
    pub fn children(&self, id: NodeId) -> NodeList {
        self.node(id)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|&c| self.is_element(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All child nodes in order, text included
    #[must_use]
    pub fn child_nodes(&self, id: NodeId) -> NodeList {
        self.node(id)
            .map(|n| NodeList::from(n.children.clone()))
            .unwrap_or_default()
    }

    /// Connected elements carrying `class`, in document order
    #[must_use]
    pub fn query_by_class(&self, class: &str) -> NodeList {
        let mut found = NodeList::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if let NodeKind::Element(data) = &node.kind {
                if data.classes.contains(class) {
                    found.push(id);
                }
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    // ------------------------------------------------------------------
    // Classes and attributes
    // ------------------------------------------------------------------

    /// Classes of an element in insertion order
    ///
    /// # Errors
    /// Fails for text nodes and foreign ids.
    pub fn class_list(&self, id: NodeId) -> Result<impl Iterator<Item = &str> + '_, DomError> {
        Ok(self.element(id)?.classes.iter().map(String::as_str))
    }

    /// Check if element carries `class`; `false` for non-elements
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_ok_and(|e| e.classes.contains(class))
    }

    /// Add a class; returns `true` if it was absent
    ///
    /// # Errors
    /// Fails for text nodes and foreign ids.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        Ok(self.element_mut(id)?.classes.insert(class.to_owned()))
    }

    /// Remove a class; returns `true` if it was present
    ///
    /// # Errors
    /// Fails for text nodes and foreign ids.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        Ok(self.element_mut(id)?.classes.shift_remove(class))
    }

    /// Read an attribute
    ///
    /// `class` reflects the class list and `data-upgraded` reflects the
    /// upgrade marker; both read as absent when empty.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        let element = self.element(id).ok()?;
        match name {
            "class" if element.classes.is_empty() => None,
            "class" => Some(join_classes(&element.classes)),
            UPGRADED_ATTRIBUTE if element.marker.is_empty() => None,
            UPGRADED_ATTRIBUTE => Some(element.marker.to_attribute()),
            _ => element.attributes.get(name).cloned(),
        }
    }

    /// Write an attribute
    ///
    /// # Errors
    /// Fails for text nodes and foreign ids.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        match name {
            "class" => {
                element.classes = value.split_whitespace().map(str::to_owned).collect();
            }
            UPGRADED_ATTRIBUTE => element.marker = UpgradeMarker::parse(value),
            _ => {
                element.attributes.insert(name.to_owned(), value.to_owned());
            }
        }
        Ok(())
    }

    /// Remove an attribute; returns `true` if it was present
    ///
    /// # Errors
    /// Fails for text nodes and foreign ids.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        let element = self.element_mut(id)?;
        let removed = match name {
            "class" => !std::mem::take(&mut element.classes).is_empty(),
            UPGRADED_ATTRIBUTE => !std::mem::take(&mut element.marker).is_empty(),
            _ => element.attributes.shift_remove(name).is_some(),
        };
        Ok(removed)
    }

    /// Upgrade marker of an element
    #[must_use]
    pub fn upgrade_marker(&self, id: NodeId) -> Option<&UpgradeMarker> {
        self.element(id).ok().map(|e| &e.marker)
    }

    /// Persist an element's upgrade marker
    ///
    /// # Errors
    /// Fails for text nodes and foreign ids.
    pub fn set_upgrade_marker(&mut self, id: NodeId, marker: UpgradeMarker) -> Result<(), DomError> {
        self.element_mut(id)?.marker = marker;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Construct an event in one step
    ///
    /// # Errors
    /// Returns [`DomError::NotSupported`] if the host has no event constructor.
    pub fn new_event(&self, event_type: &str, init: EventInit) -> Result<Event, DomError> {
        if !self.capabilities.event_constructor {
            return Err(DomError::NotSupported("event constructor"));
        }
        Ok(Event::construct(event_type, init))
    }

    /// Create an uninitialized generic event (legacy path)
    ///
    /// # Errors
    /// Returns [`DomError::NotSupported`] for unknown event interfaces.
    pub fn create_event(&self, interface: &str) -> Result<Event, DomError> {
        match interface {
            "Event" | "Events" | "HTMLEvents" => Ok(Event::generic()),
            _ => Err(DomError::NotSupported("event interface")),
        }
    }

    /// Listen for `event_type` on `target`
    ///
    /// # Errors
    /// Returns [`DomError::NodeNotFound`] for foreign ids.
    pub fn add_event_listener<F>(
        &mut self,
        target: NodeId,
        event_type: &str,
        listener: F,
    ) -> Result<ListenerId, DomError>
    where
        F: FnMut(&mut Event) + Send + 'static,
    {
        self.node(target)?;
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        let listener: Listener = Box::new(listener);
        self.listeners.entry(target).or_default().push(Registration {
            id,
            event_type: event_type.to_owned(),
            listener,
        });
        Ok(id)
    }

    /// Remove a listener; returns `true` if it was registered
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        for registrations in self.listeners.values_mut() {
            if let Some(pos) = registrations.iter().position(|r| r.id == id) {
                registrations.remove(pos);
                return true;
            }
        }
        false
    }

    /// Dispatch `event` at `target`, bubbling through ancestors if requested
    ///
    /// Returns `false` if a listener cancelled the event.
    ///
    /// # Errors
    /// - [`DomError::NodeNotFound`] for foreign ids
    /// - [`DomError::UninitializedEvent`] for a generic event never initialized
    pub fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> Result<bool, DomError> {
        self.node(target)?;
        if !event.is_initialized() {
            return Err(DomError::UninitializedEvent);
        }

        let mut path = vec![target];
        if event.bubbles() {
            let mut current = self.nodes[target.index()].parent;
            while let Some(id) = current {
                path.push(id);
                current = self.nodes[id.index()].parent;
            }
        }

        event.begin_dispatch(target);
        for node in path {
            if event.propagation_stopped() {
                break;
            }
            event.set_current_target(Some(node));
            if let Some(registrations) = self.listeners.get_mut(&node) {
                for registration in registrations.iter_mut() {
                    if registration.event_type == event.event_type() {
                        (registration.listener)(event);
                    }
                }
            }
        }
        event.set_current_target(None);

        tracing::trace!(
            event = event.event_type(),
            %target,
            cancelled = event.default_prevented(),
            "dispatched event"
        );
        Ok(!event.default_prevented())
    }

    pub(crate) fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.index()).map(|n| &n.kind)
    }
}

fn join_classes(classes: &IndexSet<String>) -> String {
    classes
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
