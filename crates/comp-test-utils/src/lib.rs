//! Testing utilities for the component handler workspace
//!
//! Shared widgets, fixtures, and listeners for integration tests.

#![allow(missing_docs)]

use comp_dom::{Document, Event, NodeId};
use comp_handler::{Component, ComponentConfig, ComponentHandler, WidgetConstructor};
use parking_lot::Mutex;
use std::sync::Arc;

/// Ordered log shared between widgets, callbacks, and listeners
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0.lock().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// Widget that logs its construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingWidget {
    pub class_name: String,
    pub element: NodeId,
}

/// Config whose constructor logs `construct:<name>:<element>`
pub fn recording_config(class_name: &str, css_class: &str, log: &EventLog) -> ComponentConfig {
    let log = log.clone();
    let name = class_name.to_owned();
    ComponentConfig::new(
        class_name,
        css_class,
        WidgetConstructor::new(move |_doc, element| {
            log.record(format!("construct:{name}:{element}"));
            RecordingWidget {
                class_name: name.clone(),
                element,
            }
        }),
    )
}

/// Handler with `LogicalA` on `.a` and `LogicalB` on `.b`, in that order
pub fn setup_ab_handler(log: &EventLog) -> ComponentHandler {
    let mut handler = ComponentHandler::new();
    handler.register(recording_config("LogicalA", "a", log)).unwrap();
    handler.register(recording_config("LogicalB", "b", log)).unwrap();
    handler
}

/// Menu widget with a visible flag mirrored into a class
#[derive(Debug)]
pub struct MaterialMenu {
    pub element: NodeId,
    pub visible: bool,
}

impl MaterialMenu {
    pub fn show(&mut self, doc: &mut Document) {
        self.visible = true;
        doc.add_class(self.element, "is-visible").unwrap();
    }

    pub fn hide(&mut self, doc: &mut Document) {
        self.visible = false;
        doc.remove_class(self.element, "is-visible").unwrap();
    }
}

impl Component for MaterialMenu {
    const CLASS_AS_STRING: &'static str = "MaterialMenu";
    const CSS_CLASS: &'static str = "mdl-js-menu";
    const MEMBERS: &'static [&'static str] = &["show", "hide"];

    fn upgrade(doc: &mut Document, element: NodeId) -> Self {
        doc.add_class(element, "is-upgraded").unwrap();
        Self {
            element,
            visible: false,
        }
    }
}

/// Tabs widget; counts its tab bar entries at upgrade time
#[derive(Debug)]
pub struct MaterialTabs {
    pub element: NodeId,
    pub tabs: usize,
}

impl Component for MaterialTabs {
    const CLASS_AS_STRING: &'static str = "MaterialTabs";
    const CSS_CLASS: &'static str = "mdl-js-tabs";

    fn upgrade(doc: &mut Document, element: NodeId) -> Self {
        let tabs = doc
            .children(element)
            .iter()
            .filter(|&child| doc.has_class(child, "mdl-tabs__tab"))
            .count();
        Self { element, tabs }
    }
}

/// Element with `classes`, appended to `parent`
pub fn element(doc: &mut Document, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
    let el = doc.create_element(tag);
    for class in classes {
        doc.add_class(el, class).unwrap();
    }
    doc.append_child(parent, el).unwrap();
    el
}

/// `<div class="a"><span class="b"></span></div>` under the root
pub fn nested_ab(doc: &mut Document) -> (NodeId, NodeId) {
    let root = doc.root();
    let div = element(doc, root, "div", &["a"]);
    let span = element(doc, div, "span", &["b"]);
    (div, span)
}

/// Cancel `event_type` whenever its target is `victim`
///
/// Installed on the document element so it sees bubbling events from every
/// element.
pub fn cancel_for(doc: &mut Document, event_type: &str, victim: NodeId) {
    let root = doc.root();
    doc.add_event_listener(root, event_type, move |event: &mut Event| {
        if event.target() == Some(victim) {
            event.prevent_default();
        }
    })
    .unwrap();
}

/// Log `<event_type>:<target>` for every `event_type` reaching `node`
pub fn record_events(doc: &mut Document, node: NodeId, event_type: &str, log: &EventLog) {
    let log = log.clone();
    let name = event_type.to_owned();
    doc.add_event_listener(node, event_type, move |event: &mut Event| {
        if let Some(target) = event.target() {
            log.record(format!("{name}:{target}"));
        }
    })
    .unwrap();
}
