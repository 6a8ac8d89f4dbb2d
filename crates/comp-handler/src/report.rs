//! Upgrade reports for the CLI

use crate::handler::{ComponentHandler, HandlerMode};
use crate::instance::InstanceId;
use comp_dom::{Document, NodeId};
use serde::Serialize;
use std::fmt;

/// One tracked instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceSummary {
    /// Instance id
    pub id: InstanceId,
    /// Element it lives on
    pub element: NodeId,
    /// Element tag
    pub tag: String,
    /// Producing logical name
    pub class_name: String,
    /// Producing marker class
    pub css_class: String,
    /// Reachable through the widget table
    pub exposed: bool,
}

/// Snapshot of a handler after a run
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeReport {
    /// Handler mode
    pub mode: HandlerMode,
    /// Registered logical names
    pub components: Vec<String>,
    /// Instances created by the run
    pub upgraded: usize,
    /// Instances torn down by the run
    pub downgraded: usize,
    /// Instances still tracked
    pub instances: Vec<InstanceSummary>,
    /// Final document markup
    pub markup: String,
}

impl UpgradeReport {
    /// Collect from a handler and its document
    #[must_use]
    pub fn collect(handler: &ComponentHandler, doc: &Document, upgraded: usize, downgraded: usize) -> Self {
        let instances = handler
            .instances()
            .map(|instance| InstanceSummary {
                id: instance.id(),
                element: instance.element(),
                tag: doc.tag_name(instance.element()).unwrap_or_default().to_owned(),
                class_name: instance.class_name().to_owned(),
                css_class: instance.config().css_class.clone(),
                exposed: handler.instances.exposed(instance.element(), instance.class_name()) == Some(instance.id()),
            })
            .collect();

        Self {
            mode: handler.mode(),
            components: handler.registry().names().into_iter().map(str::to_owned).collect(),
            upgraded,
            downgraded,
            instances,
            markup: doc.outer_html(doc.root()),
        }
    }
}

impl fmt::Display for UpgradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Component Handler Report")?;
        writeln!(f, "========================")?;
        writeln!(f, "Mode: {:?}", self.mode)?;
        writeln!(f, "Components: {}", self.components.join(", "))?;
        writeln!(f, "Upgraded: {}", self.upgraded)?;
        writeln!(f, "Downgraded: {}", self.downgraded)?;
        writeln!(f)?;
        writeln!(f, "Instances ({}):", self.instances.len())?;
        for instance in &self.instances {
            writeln!(
                f,
                "  {} <{}> {} {} [{}]{}",
                instance.id,
                instance.tag,
                instance.element,
                instance.class_name,
                instance.css_class,
                if instance.exposed { "" } else { " (hidden)" }
            )?;
        }
        writeln!(f)?;
        write!(f, "{}", self.markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::WidgetConstructor;
    use crate::registry::ComponentConfig;

    #[test]
    fn report_lists_instances_and_markup() {
        let mut handler = ComponentHandler::new();
        handler
            .register(ComponentConfig::new("Chip", "chip", WidgetConstructor::new(|_doc, _el| ())))
            .unwrap();

        let mut doc = Document::new();
        let el = doc.create_element("span");
        doc.add_class(el, "chip").unwrap();
        let root = doc.root();
        doc.append_child(root, el).unwrap();
        let upgraded = handler.bootstrap(&mut doc).unwrap();

        let report = UpgradeReport::collect(&handler, &doc, upgraded, 0);
        assert_eq!(report.mode, HandlerMode::Active);
        assert_eq!(report.instances.len(), 1);
        assert_eq!(report.instances[0].tag, "span");
        assert!(report.instances[0].exposed);
        assert!(report.markup.contains(r#"data-upgraded="Chip""#));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "active");
        assert_eq!(json["instances"][0]["class_name"], "Chip");

        let text = report.to_string();
        assert!(text.contains("Upgraded: 1"));
        assert!(text.contains("Chip [chip]"));
    }
}
