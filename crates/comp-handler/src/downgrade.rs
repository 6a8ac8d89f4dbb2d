//! Downgrade engine
//!
//! Inverse of the upgrade engine: tears down tracked instances and strips
//! their names from the element's upgrade marker.

use crate::error::{HandlerError, Result};
use crate::events::{lifecycle_event, LifecycleEvent};
use crate::handler::ComponentHandler;
use crate::instance::ComponentInstance;
use crate::lifecycle::ComponentState;
use comp_dom::{Document, NodeList};

impl ComponentHandler {
    pub(crate) fn downgrade_nodes_internal(&mut self, doc: &mut Document, nodes: NodeList) -> Result<usize> {
        if let Some(bad) = nodes.iter().find(|&node| !doc.contains(node)) {
            return Err(HandlerError::InvalidNode(bad));
        }

        let mut total = 0;
        for node in nodes.iter() {
            while let Some(class_name) = self.instances.first_for(node).map(|i| i.class_name().to_owned()) {
                self.state(doc, node, &class_name).transition(ComponentState::Unupgraded)?;
                let Some(instance) = self.instances.remove_first_for(node) else {
                    break;
                };
                self.deconstruct(doc, instance)?;
                total += 1;
            }
        }
        Ok(total)
    }

    /// Unwind one instance that was already removed from tracking
    fn deconstruct(&mut self, doc: &mut Document, instance: ComponentInstance) -> Result<()> {
        let element = instance.element();

        if let Some(marker) = doc.upgrade_marker(element) {
            let mut marker = marker.clone();
            marker.remove(instance.class_name());
            doc.set_upgrade_marker(element, marker)?;
        }

        tracing::debug!(
            %element,
            class_name = instance.class_name(),
            instance = %instance.id(),
            "downgraded element"
        );

        // Dropping the widget is its teardown.
        drop(instance);

        let mut downgraded = lifecycle_event(doc, &self.config.events, LifecycleEvent::Downgraded)?;
        doc.dispatch_event(element, &mut downgraded)?;
        Ok(())
    }
}
