//! JSON component manifests
//!
//! A manifest lists widget types by logical name and marker class so a
//! registry can be assembled without linking the widget code. Entries are
//! registered with an [`InertWidget`] constructor.

use crate::error::Result;
use crate::handler::ComponentHandler;
use crate::instance::WidgetConstructor;
use crate::registry::ComponentConfig;
use comp_dom::NodeId;
use serde::{Deserialize, Serialize};

/// Placeholder widget built for manifest entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InertWidget {
    /// Logical name it was built for
    pub class_name: String,
    /// Element it lives on
    pub element: NodeId,
}

/// One manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentManifest {
    /// Logical name
    pub class_as_string: String,
    /// Marker class
    pub css_class: String,
    /// Widget flag; absent means `true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<bool>,
    /// Public member names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

impl ComponentManifest {
    /// Registration config with an [`InertWidget`] constructor
    #[must_use]
    pub fn to_config(&self) -> ComponentConfig {
        let class_name = self.class_as_string.clone();
        let constructor = WidgetConstructor::new(move |_doc, element| InertWidget {
            class_name: class_name.clone(),
            element,
        })
        .with_members(self.members.iter().cloned());

        ComponentConfig {
            constructor,
            class_as_string: self.class_as_string.clone(),
            css_class: self.css_class.clone(),
            widget: self.widget,
        }
    }
}

/// Ordered list of manifest entries, as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryManifest {
    /// Entries in registration order
    pub components: Vec<ComponentManifest>,
}

impl RegistryManifest {
    /// Parse from a JSON array
    ///
    /// # Errors
    /// Returns the decoder error for malformed input.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Register every entry in order, stopping at the first failure
    ///
    /// # Errors
    /// The first registration error.
    pub fn register_all(&self, handler: &mut ComponentHandler) -> Result<usize> {
        for entry in &self.components {
            handler.register(entry.to_config())?;
        }
        Ok(self.components.len())
    }
}
