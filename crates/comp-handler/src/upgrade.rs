//! Upgrade engine
//!
//! Finds elements carrying registered marker classes and instantiates the
//! matching widgets on them, at most once per (element, logical name).

use crate::error::{HandlerError, Result};
use crate::events::{lifecycle_event, LifecycleEvent};
use crate::handler::{ComponentHandler, UpgradeOutcome};
use crate::instance::InstanceConfig;
use crate::lifecycle::ComponentState;
use comp_dom::{Document, NodeId, NodeList};

impl ComponentHandler {
    /// Upgrade every element matching a descriptor, or every descriptor
    pub(crate) fn upgrade_dom_internal(
        &mut self,
        doc: &mut Document,
        class_name: Option<&str>,
        css_class: Option<&str>,
    ) -> Result<usize> {
        match (class_name, css_class) {
            (None, None) => {
                let pairs: Vec<(String, String)> = self
                    .registry
                    .iter()
                    .map(|d| (d.class_name().to_owned(), d.css_class().to_owned()))
                    .collect();
                let mut total = 0;
                for (name, css) in &pairs {
                    total += self.upgrade_dom_internal(doc, Some(name), Some(css))?;
                }
                Ok(total)
            }
            (Some(name), css) => {
                let css = match css {
                    Some(css) => css.to_owned(),
                    None => match self.registry.find(name) {
                        Some(descriptor) => descriptor.css_class().to_owned(),
                        None => {
                            tracing::debug!(class_name = name, "no marker class for unknown component");
                            return Ok(0);
                        }
                    },
                };
                let mut total = 0;
                for element in doc.query_by_class(&css) {
                    total += self
                        .upgrade_element_internal(doc, element, Some(name))?
                        .instantiated();
                }
                Ok(total)
            }
            (None, Some(css)) => {
                let mut total = 0;
                for element in doc.query_by_class(css) {
                    total += self.upgrade_element_internal(doc, element, None)?.instantiated();
                }
                Ok(total)
            }
        }
    }

    /// Upgrade one element for one descriptor or for all it matches
    pub(crate) fn upgrade_element_internal(
        &mut self,
        doc: &mut Document,
        element: NodeId,
        class_name: Option<&str>,
    ) -> Result<UpgradeOutcome> {
        if !doc.is_element(element) {
            return Err(HandlerError::InvalidElement(element));
        }

        let mut upgrading = lifecycle_event(doc, &self.config.events, LifecycleEvent::Upgrading)?;
        if !doc.dispatch_event(element, &mut upgrading)? {
            tracing::debug!(%element, "upgrade cancelled by listener");
            return Ok(UpgradeOutcome::Cancelled);
        }

        let mut marker = doc.upgrade_marker(element).cloned().unwrap_or_default();

        // `None` marks a requested name with no descriptor.
        let mut selected: Vec<Option<usize>> = Vec::new();
        match class_name {
            None => {
                for (index, descriptor) in self.registry.iter().enumerate() {
                    if doc.has_class(element, descriptor.css_class())
                        && !selected.contains(&Some(index))
                        && !marker.contains(descriptor.class_name())
                    {
                        selected.push(Some(index));
                    }
                }
            }
            Some(name) if !marker.contains(name) => selected.push(self.registry.position(name)),
            Some(_) => {}
        }

        let mut created = Vec::with_capacity(selected.len());
        for slot in selected {
            let descriptor = slot
                .and_then(|index| self.registry.get(index))
                .cloned()
                .ok_or_else(|| HandlerError::ComponentNotFound(class_name.unwrap_or_default().to_owned()))?;

            let state = self
                .state(doc, element, descriptor.class_name())
                .transition(ComponentState::Upgrading)?;
            marker.insert(descriptor.class_name());
            doc.set_upgrade_marker(element, marker.clone())?;

            let widget = descriptor.constructor().construct(doc, element);
            let id = self.instances.track(
                element,
                InstanceConfig {
                    class_name: descriptor.class_name().to_owned(),
                    css_class: descriptor.css_class().to_owned(),
                },
                widget,
            );

            for callback in descriptor.callbacks() {
                callback(doc, element);
            }
            if descriptor.is_widget() {
                self.instances.expose(element, descriptor.class_name(), id);
            }
            state.transition(ComponentState::Upgraded)?;

            tracing::debug!(
                %element,
                class_name = descriptor.class_name(),
                instance = %id,
                "upgraded element"
            );

            let mut upgraded = lifecycle_event(doc, &self.config.events, LifecycleEvent::Upgraded)?;
            doc.dispatch_event(element, &mut upgraded)?;
            created.push(id);
        }

        Ok(UpgradeOutcome::Upgraded(created))
    }

    /// Upgrade each element then its element children, depth-first pre-order
    ///
    /// Children are read after their parent is upgraded so that elements a
    /// constructor inserts are visited too.
    pub(crate) fn upgrade_elements_internal(
        &mut self,
        doc: &mut Document,
        elements: NodeList,
    ) -> Result<usize> {
        let mut total = 0;
        let mut stack: Vec<NodeId> = elements.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if !doc.is_element(node) {
                continue;
            }
            total += self.upgrade_element_internal(doc, node, None)?.instantiated();
            stack.extend(doc.children(node).iter().rev());
        }
        Ok(total)
    }

    /// Re-scan the document for every registered name
    pub(crate) fn upgrade_all_registered_internal(&mut self, doc: &mut Document) -> Result<usize> {
        let names: Vec<String> = self.registry.names().into_iter().map(str::to_owned).collect();
        let mut total = 0;
        for name in &names {
            total += self.upgrade_dom_internal(doc, Some(name), None)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use crate::handler::{ComponentHandler, UpgradeOutcome};
    use crate::instance::WidgetConstructor;
    use crate::lifecycle::ComponentState;
    use crate::registry::ComponentConfig;
    use crate::HandlerError;
    use comp_dom::{Document, NodeId};

    #[derive(Debug)]
    struct Stub {
        element: NodeId,
    }

    fn stub(name: &str, css: &str) -> ComponentConfig {
        ComponentConfig::new(name, css, WidgetConstructor::new(|_doc, element| Stub { element }))
    }

    fn attach(doc: &mut Document, parent: NodeId, classes: &[&str]) -> NodeId {
        let el = doc.create_element("div");
        for class in classes {
            doc.add_class(el, class).unwrap();
        }
        doc.append_child(parent, el).unwrap();
        el
    }

    #[test]
    fn element_with_two_markers_gets_both_in_registry_order() {
        let mut handler = ComponentHandler::new();
        handler.register(stub("B", "b")).unwrap();
        handler.register(stub("A", "a")).unwrap();

        let mut doc = Document::new();
        let root = doc.root();
        let el = attach(&mut doc, root, &["a", "b"]);

        let outcome = handler.upgrade_element(&mut doc, el, None).unwrap();
        assert_eq!(outcome.instantiated(), 2);
        assert_eq!(doc.attribute(el, "data-upgraded").as_deref(), Some("B,A"));
    }

    #[test]
    fn named_upgrade_ignores_marker_class() {
        let mut handler = ComponentHandler::new();
        handler.register(stub("A", "a")).unwrap();

        let mut doc = Document::new();
        let root = doc.root();
        let plain = attach(&mut doc, root, &[]);

        let outcome = handler.upgrade_element(&mut doc, plain, Some("A")).unwrap();
        assert_eq!(outcome.instantiated(), 1);
        assert_eq!(handler.widget_as::<Stub>(plain, "A").unwrap().element, plain);
    }

    #[test]
    fn unknown_name_is_component_not_found() {
        let mut handler = ComponentHandler::new();
        let mut doc = Document::new();
        let root = doc.root();
        let el = attach(&mut doc, root, &[]);

        let err = handler.upgrade_element(&mut doc, el, Some("Missing")).unwrap_err();
        assert_eq!(err, HandlerError::ComponentNotFound("Missing".into()));
        assert!(doc.upgrade_marker(el).unwrap().is_empty());
    }

    #[test]
    fn text_node_is_invalid_element() {
        let mut handler = ComponentHandler::new();
        let mut doc = Document::new();
        let text = doc.create_text_node("x");
        let err = handler.upgrade_element(&mut doc, text, None).unwrap_err();
        assert_eq!(err, HandlerError::InvalidElement(text));
    }

    #[test]
    fn foreign_id_is_invalid_element() {
        let mut handler = ComponentHandler::new();
        let mut doc = Document::new();
        let bogus = NodeId::from_index(999);
        assert!(matches!(
            handler.upgrade_element(&mut doc, bogus, None),
            Err(HandlerError::InvalidElement(_))
        ));
    }

    #[test]
    fn upgrade_dom_by_css_class_only() {
        let mut handler = ComponentHandler::new();
        handler.register(stub("A", "a")).unwrap();

        let mut doc = Document::new();
        let root = doc.root();
        attach(&mut doc, root, &["a"]);
        attach(&mut doc, root, &["a"]);

        assert_eq!(handler.upgrade_dom(&mut doc, None, Some("a")).unwrap(), 2);
        assert_eq!(handler.instance_count(), 2);
    }

    #[test]
    fn upgrade_dom_unknown_name_matches_nothing() {
        let mut handler = ComponentHandler::new();
        let mut doc = Document::new();
        assert_eq!(handler.upgrade_dom(&mut doc, Some("Missing"), None).unwrap(), 0);
    }

    #[test]
    fn constructor_inserted_children_are_visited() {
        let mut handler = ComponentHandler::new();
        handler
            .register(ComponentConfig::new(
                "Host",
                "host",
                WidgetConstructor::new(|doc, element| {
                    let inner = doc.create_element("span");
                    doc.add_class(inner, "inner").unwrap();
                    doc.append_child(element, inner).unwrap();
                    Stub { element }
                }),
            ))
            .unwrap();
        handler.register(stub("Inner", "inner")).unwrap();

        let mut doc = Document::new();
        let root = doc.root();
        let host = attach(&mut doc, root, &["host"]);

        assert_eq!(handler.upgrade_elements(&mut doc, host).unwrap(), 2);
    }

    #[test]
    fn stripped_marker_with_live_instance_is_illegal() {
        let mut handler = ComponentHandler::new();
        handler.register(stub("A", "a")).unwrap();

        let mut doc = Document::new();
        let root = doc.root();
        let el = attach(&mut doc, root, &["a"]);
        handler.upgrade_element(&mut doc, el, Some("A")).unwrap();
        assert!(doc.remove_attribute(el, "data-upgraded").unwrap());
        assert_eq!(handler.state(&doc, el, "A"), ComponentState::Upgraded);

        let err = handler.upgrade_element(&mut doc, el, Some("A")).unwrap_err();
        assert_eq!(
            err,
            HandlerError::IllegalTransition {
                from: ComponentState::Upgraded,
                to: ComponentState::Upgrading,
            }
        );
        assert!(handler.upgrade_element(&mut doc, el, None).is_err());
        assert_eq!(handler.instances_for(el).count(), 1);
        assert!(doc.upgrade_marker(el).unwrap().is_empty());
    }

    #[test]
    fn preupgraded_marker_reports_upgraded() {
        let mut handler = ComponentHandler::new();
        handler.register(stub("A", "a")).unwrap();

        let mut doc = Document::new();
        let root = doc.root();
        let el = attach(&mut doc, root, &["a"]);
        assert_eq!(handler.state(&doc, el, "A"), ComponentState::Unupgraded);
        doc.set_attribute(el, "data-upgraded", "A").unwrap();

        assert_eq!(handler.state(&doc, el, "A"), ComponentState::Upgraded);
        assert_eq!(handler.upgrade_element(&mut doc, el, None).unwrap().instantiated(), 0);
    }

    #[test]
    fn outcome_counts() {
        assert_eq!(UpgradeOutcome::Cancelled.instantiated(), 0);
        assert_eq!(UpgradeOutcome::Disabled.instantiated(), 0);
    }
}
