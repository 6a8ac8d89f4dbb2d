//! Component handler facade
//!
//! [`ComponentHandler`] is the registry service object: widget modules
//! register through it, page bootstrap triggers the first upgrade pass through
//! it, and later code upgrades or downgrades dynamic content through it.
//!
//! # Example
//!
//! ```rust
//! use comp_dom::Document;
//! use comp_handler::{ComponentConfig, ComponentHandler, WidgetConstructor};
//!
//! struct Badge;
//!
//! let mut handler = ComponentHandler::new();
//! handler
//!     .register(ComponentConfig::new("MaterialBadge", "mdl-badge", WidgetConstructor::new(|_doc, _el| Badge)))
//!     .unwrap();
//!
//! let mut doc = Document::new();
//! let el = doc.create_element("span");
//! doc.add_class(el, "mdl-badge").unwrap();
//! doc.append_child(doc.root(), el).unwrap();
//!
//! assert_eq!(handler.bootstrap(&mut doc).unwrap(), 1);
//! assert!(handler.is_upgraded(&doc, el, "MaterialBadge"));
//! ```

use crate::config::HandlerConfig;
use crate::error::Result;
use crate::instance::{ComponentInstance, InstanceId, InstanceTracker, Widget};
use crate::lifecycle::ComponentState;
use crate::registry::{Component, ComponentConfig, ComponentRegistry};
use comp_dom::{Document, HostCapabilities, NodeId, NodeList};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::sync::Arc;

/// Handler mode, decided by [`ComponentHandler::bootstrap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerMode {
    /// Bootstrap has not run yet; every operation is live
    #[default]
    Pending,
    /// Host passed feature detection
    Active,
    /// Host failed feature detection; `register` and `upgrade_element` are inert
    Degraded,
}

/// Result of upgrading one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// Instances created, in application order (possibly none)
    Upgraded(Vec<InstanceId>),
    /// An `upgrading` listener cancelled the upgrade
    Cancelled,
    /// The handler is degraded
    Disabled,
}

impl UpgradeOutcome {
    /// Number of instances created
    #[must_use]
    pub fn instantiated(&self) -> usize {
        match self {
            Self::Upgraded(ids) => ids.len(),
            Self::Cancelled | Self::Disabled => 0,
        }
    }

    /// Check if a listener cancelled the upgrade
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Check whether a host offers the primitives the handler relies on
#[must_use]
pub fn host_supported(capabilities: HostCapabilities) -> bool {
    capabilities.class_list && capabilities.query_selector && capabilities.event_listener
}

/// Registry service object
///
/// Owns the descriptor registry and the instance tracking list. Create one per
/// application (or per test) and pass it to whatever needs to register or
/// query widgets.
#[derive(Debug, Default)]
pub struct ComponentHandler {
    pub(crate) config: HandlerConfig,
    pub(crate) registry: ComponentRegistry,
    pub(crate) instances: InstanceTracker,
    mode: HandlerMode,
}

impl ComponentHandler {
    /// Create handler with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create handler with custom configuration
    #[must_use]
    pub fn with_config(config: HandlerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Registered descriptors
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Current mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> HandlerMode {
        self.mode
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a widget type
    ///
    /// A no-op once the handler is degraded.
    ///
    /// # Errors
    /// - [`HandlerError::DuplicateCssClass`](crate::HandlerError::DuplicateCssClass)
    /// - [`HandlerError::DuplicateClassName`](crate::HandlerError::DuplicateClassName)
    /// - [`HandlerError::ReservedProperty`](crate::HandlerError::ReservedProperty)
    pub fn register(&mut self, config: ComponentConfig) -> Result<()> {
        if self.mode == HandlerMode::Degraded {
            tracing::debug!(class_name = %config.class_as_string, "handler degraded, registration ignored");
            return Ok(());
        }
        self.registry.register(config)
    }

    /// Register a typed [`Component`]
    ///
    /// # Errors
    /// See [`register`](Self::register).
    pub fn register_component<C: Component>(&mut self) -> Result<()> {
        self.register(ComponentConfig::of::<C>())
    }

    /// Run `callback` with every element newly upgraded by `class_name`
    ///
    /// Unknown names are ignored.
    pub fn register_upgraded_callback<F>(&mut self, class_name: &str, callback: F)
    where
        F: Fn(&mut Document, NodeId) + Send + Sync + 'static,
    {
        self.registry.register_upgraded_callback(class_name, Arc::new(callback));
    }

    // ------------------------------------------------------------------
    // Upgrade / downgrade
    // ------------------------------------------------------------------

    /// Upgrade matching elements across the document
    ///
    /// With no arguments every descriptor is applied. Returns the number of
    /// instances created.
    ///
    /// # Errors
    /// Propagates the first failing [`upgrade_element`](Self::upgrade_element).
    pub fn upgrade_dom(
        &mut self,
        doc: &mut Document,
        class_name: Option<&str>,
        css_class: Option<&str>,
    ) -> Result<usize> {
        self.upgrade_dom_internal(doc, class_name, css_class)
    }

    /// Upgrade one element, for one logical name or for every marker class it
    /// carries
    ///
    /// # Errors
    /// - [`HandlerError::InvalidElement`](crate::HandlerError::InvalidElement) if `element` is not an element
    /// - [`HandlerError::ComponentNotFound`](crate::HandlerError::ComponentNotFound) for an unregistered name
    pub fn upgrade_element(
        &mut self,
        doc: &mut Document,
        element: NodeId,
        class_name: Option<&str>,
    ) -> Result<UpgradeOutcome> {
        if self.mode == HandlerMode::Degraded {
            return Ok(UpgradeOutcome::Disabled);
        }
        self.upgrade_element_internal(doc, element, class_name)
    }

    /// Upgrade the given elements and all their descendants, pre-order
    ///
    /// # Errors
    /// Propagates the first failing upgrade.
    pub fn upgrade_elements(&mut self, doc: &mut Document, elements: impl Into<NodeList>) -> Result<usize> {
        self.upgrade_elements_internal(doc, elements.into())
    }

    /// Re-scan the document for every registered logical name
    ///
    /// # Errors
    /// Propagates the first failing upgrade.
    pub fn upgrade_all_registered(&mut self, doc: &mut Document) -> Result<usize> {
        self.upgrade_all_registered_internal(doc)
    }

    /// Tear down every tracked instance on the given nodes
    ///
    /// Returns the number of instances removed.
    ///
    /// # Errors
    /// Returns [`HandlerError::InvalidNode`](crate::HandlerError::InvalidNode)
    /// before changing anything if a node is not part of `doc`.
    pub fn downgrade_elements(&mut self, doc: &mut Document, nodes: impl Into<NodeList>) -> Result<usize> {
        self.downgrade_nodes_internal(doc, nodes.into())
    }

    /// Host startup hook
    ///
    /// On a capable host, flags the document element with the capability class
    /// and upgrades everything registered. Otherwise the handler degrades and
    /// nothing is upgraded.
    ///
    /// # Errors
    /// Propagates upgrade failures.
    pub fn bootstrap(&mut self, doc: &mut Document) -> Result<usize> {
        let capabilities = doc.capabilities();
        if !host_supported(capabilities) {
            tracing::warn!(?capabilities, "host lacks required features, component handler disabled");
            self.mode = HandlerMode::Degraded;
            return Ok(0);
        }

        let root = doc.root();
        doc.add_class(root, &self.config.capability_class)?;
        self.mode = HandlerMode::Active;

        let upgraded = self.upgrade_all_registered(doc)?;
        tracing::info!(
            components = self.registry.len(),
            instances = upgraded,
            "component handler bootstrapped"
        );
        Ok(upgraded)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Tracked instances, oldest first
    pub fn instances(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.instances.iter()
    }

    /// Tracked instances on `element`
    pub fn instances_for(&self, element: NodeId) -> impl Iterator<Item = &ComponentInstance> {
        self.instances.iter().filter(move |i| i.element() == element)
    }

    /// Tracked instance by id
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&ComponentInstance> {
        self.instances.get(id)
    }

    /// Number of tracked instances
    #[inline]
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Check if `element`'s marker lists `class_name`
    #[must_use]
    pub fn is_upgraded(&self, doc: &Document, element: NodeId, class_name: &str) -> bool {
        doc.upgrade_marker(element).is_some_and(|m| m.contains(class_name))
    }

    /// Upgrade state of `element` for `class_name`
    ///
    /// `Upgraded` if the marker lists the name or a tracked instance exists.
    /// A tracked instance whose name was stripped from the marker still counts,
    /// so it cannot be upgraded a second time.
    #[must_use]
    pub fn state(&self, doc: &Document, element: NodeId, class_name: &str) -> ComponentState {
        if self.is_upgraded(doc, element, class_name) || self.instances.is_tracked(element, class_name) {
            ComponentState::Upgraded
        } else {
            ComponentState::Unupgraded
        }
    }

    /// Widget exposed on `element` under `class_name`
    ///
    /// `None` if not upgraded or if the descriptor's widget flag is off.
    #[must_use]
    pub fn widget(&self, element: NodeId, class_name: &str) -> Option<&dyn Widget> {
        let id = self.instances.exposed(element, class_name)?;
        self.instances.get(id).map(ComponentInstance::widget)
    }

    /// Exposed widget downcast to `T`
    #[must_use]
    pub fn widget_as<T: Widget>(&self, element: NodeId, class_name: &str) -> Option<&T> {
        let id = self.instances.exposed(element, class_name)?;
        self.instances.get(id)?.downcast_ref::<T>()
    }

    /// Exposed widget downcast to `T`, mutably
    pub fn widget_as_mut<T: Widget>(&mut self, element: NodeId, class_name: &str) -> Option<&mut T> {
        let id = self.instances.exposed(element, class_name)?;
        self.instances.get_mut(id)?.downcast_mut::<T>()
    }
}

/// Cloneable handle to one handler shared by several owners
#[derive(Debug, Clone, Default)]
pub struct SharedHandler {
    inner: Arc<Mutex<ComponentHandler>>,
}

impl SharedHandler {
    /// Wrap a handler
    #[must_use]
    pub fn new(handler: ComponentHandler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(handler)),
        }
    }

    /// Lock the handler
    pub fn lock(&self) -> MutexGuard<'_, ComponentHandler> {
        self.inner.lock()
    }

    /// Register through the shared handler
    ///
    /// # Errors
    /// See [`ComponentHandler::register`].
    pub fn register(&self, config: ComponentConfig) -> Result<()> {
        self.lock().register(config)
    }

    /// Bootstrap through the shared handler
    ///
    /// # Errors
    /// See [`ComponentHandler::bootstrap`].
    pub fn bootstrap(&self, doc: &mut Document) -> Result<usize> {
        self.lock().bootstrap(doc)
    }
}
