//! Component Handler
//!
//! Registers widget types and upgrades plain markup elements into widgets.
//!
//! # Overview
//!
//! - [`ComponentHandler`]: the registry service object and single integration
//!   surface
//! - [`ComponentRegistry`]: ordered descriptors, unique by logical name and by
//!   marker class
//! - Upgrade engine: finds unupgraded elements carrying registered marker
//!   classes and instantiates their widgets, at most once per logical name
//! - Downgrade engine: tears instances down and reverts the element marker
//! - [`events`]: lifecycle events with a legacy-host fallback
//!
//! # Lifecycle
//!
//! Per element and logical name: `Unupgraded -> Upgrading -> Upgraded`, and
//! back to `Unupgraded` on downgrade. A listener on the `upgrading` event can
//! cancel an element's upgrade; that is the only cancellation point.
//!
//! # Example
//!
//! ```rust
//! use comp_dom::{Document, NodeId};
//! use comp_handler::{Component, ComponentHandler};
//!
//! struct MaterialMenu {
//!     element: NodeId,
//! }
//!
//! impl Component for MaterialMenu {
//!     const CLASS_AS_STRING: &'static str = "MaterialMenu";
//!     const CSS_CLASS: &'static str = "mdl-js-menu";
//!
//!     fn upgrade(_doc: &mut Document, element: NodeId) -> Self {
//!         Self { element }
//!     }
//! }
//!
//! let mut handler = ComponentHandler::new();
//! handler.register_component::<MaterialMenu>().unwrap();
//!
//! let mut doc = Document::new();
//! let menu = doc.create_element("ul");
//! doc.add_class(menu, "mdl-js-menu").unwrap();
//! doc.append_child(doc.root(), menu).unwrap();
//!
//! handler.bootstrap(&mut doc).unwrap();
//! let widget = handler.widget_as::<MaterialMenu>(menu, "MaterialMenu").unwrap();
//! assert_eq!(widget.element, menu);
//! ```

#![warn(missing_docs)]

pub mod config;
mod downgrade;
pub mod error;
pub mod events;
pub mod handler;
pub mod instance;
pub mod lifecycle;
pub mod manifest;
pub mod registry;
pub mod report;
mod upgrade;

// Re-exports
pub use config::{EventNames, HandlerConfig};
pub use error::{HandlerError, Result};
pub use events::{create_event, LifecycleEvent};
pub use handler::{host_supported, ComponentHandler, HandlerMode, SharedHandler, UpgradeOutcome};
pub use instance::{
    ComponentInstance, InstanceConfig, InstanceId, Widget, WidgetConstructor, RESERVED_CONFIG_PROPERTY,
};
pub use lifecycle::ComponentState;
pub use manifest::{ComponentManifest, InertWidget, RegistryManifest};
pub use registry::{Component, ComponentConfig, ComponentDescriptor, ComponentRegistry, UpgradeCallback};
pub use report::{InstanceSummary, UpgradeReport};

/// Common imports for widget modules
pub mod prelude {
    pub use crate::handler::{ComponentHandler, SharedHandler, UpgradeOutcome};
    pub use crate::instance::{Widget, WidgetConstructor};
    pub use crate::registry::{Component, ComponentConfig};
    pub use comp_dom::{Document, NodeId, NodeList};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
