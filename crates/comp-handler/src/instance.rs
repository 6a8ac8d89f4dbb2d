//! Widget instances and their tracking list
//!
//! Provides [`Widget`], [`WidgetConstructor`], and the handler-owned tracker
//! that remembers every live [`ComponentInstance`] in creation order.

use comp_dom::{Document, NodeId};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Member name reserved for the handler's per-instance bookkeeping
pub const RESERVED_CONFIG_PROPERTY: &str = "componentConfigInternal_";

/// Behavior unit attached to one element
///
/// Implemented for every `Send + 'static` type; concrete widget APIs are
/// reached by downcasting through [`as_any`](Self::as_any).
pub trait Widget: Any + Send {
    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any` for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Concrete type name, for diagnostics
    fn widget_type(&self) -> &'static str;
}

impl<T: Any + Send> Widget for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn widget_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

type ConstructFn = dyn Fn(&mut Document, NodeId) -> Box<dyn Widget> + Send + Sync;

/// Callable producing a widget for an element
///
/// Carries the names of the widget's public members so registration can
/// reject constructors that would shadow [`RESERVED_CONFIG_PROPERTY`].
#[derive(Clone)]
pub struct WidgetConstructor {
    build: Arc<ConstructFn>,
    members: Vec<String>,
}

impl WidgetConstructor {
    /// Wrap a constructor function
    pub fn new<W, F>(build: F) -> Self
    where
        W: Widget,
        F: Fn(&mut Document, NodeId) -> W + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(move |doc: &mut Document, element: NodeId| -> Box<dyn Widget> {
                Box::new(build(doc, element))
            }),
            members: Vec::new(),
        }
    }

    /// Declare the widget's public member names
    #[must_use]
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members.extend(members.into_iter().map(Into::into));
        self
    }

    /// Declared member names
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Check if the widget declares `name`
    #[inline]
    #[must_use]
    pub fn defines_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    /// Run the constructor
    pub fn construct(&self, doc: &mut Document, element: NodeId) -> Box<dyn Widget> {
        (self.build)(doc, element)
    }
}

impl fmt::Debug for WidgetConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConstructor")
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

/// Identity of a tracked instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct InstanceId(u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance-{}", self.0)
    }
}

/// Bookkeeping attached to every instance: which descriptor produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceConfig {
    /// Logical name of the producing descriptor
    pub class_name: String,
    /// Marker class of the producing descriptor
    pub css_class: String,
}

/// One widget living on one element
pub struct ComponentInstance {
    id: InstanceId,
    element: NodeId,
    config: InstanceConfig,
    widget: Box<dyn Widget>,
}

impl ComponentInstance {
    /// Instance id
    #[inline]
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Originating element
    #[inline]
    #[must_use]
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Producing descriptor's bookkeeping
    #[inline]
    #[must_use]
    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    /// Logical name of the producing descriptor
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.config.class_name
    }

    /// The widget
    #[inline]
    #[must_use]
    pub fn widget(&self) -> &dyn Widget {
        &*self.widget
    }

    /// The widget, mutably
    #[inline]
    pub fn widget_mut(&mut self) -> &mut dyn Widget {
        &mut *self.widget
    }

    /// Downcast the widget
    #[must_use]
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        self.widget().as_any().downcast_ref::<T>()
    }

    /// Downcast the widget mutably
    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        self.widget_mut().as_any_mut().downcast_mut::<T>()
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("config", &self.config)
            .field("widget", &self.widget().widget_type())
            .finish()
    }
}

/// Tracking list plus the per-element widget table
///
/// The widget table replaces "expose the instance as a property named after
/// the component": lookups are keyed by `(element, logical name)`.
#[derive(Debug, Default)]
pub(crate) struct InstanceTracker {
    instances: Vec<ComponentInstance>,
    exposed: HashMap<(NodeId, String), InstanceId>,
    next_id: u64,
}

impl InstanceTracker {
    pub(crate) fn track(
        &mut self,
        element: NodeId,
        config: InstanceConfig,
        widget: Box<dyn Widget>,
    ) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.push(ComponentInstance {
            id,
            element,
            config,
            widget,
        });
        id
    }

    pub(crate) fn expose(&mut self, element: NodeId, class_name: &str, id: InstanceId) {
        self.exposed.insert((element, class_name.to_owned()), id);
    }

    /// Remove the oldest tracked instance on `element`
    pub(crate) fn remove_first_for(&mut self, element: NodeId) -> Option<ComponentInstance> {
        let pos = self.instances.iter().position(|i| i.element == element)?;
        let instance = self.instances.remove(pos);
        let key = (element, instance.config.class_name.clone());
        if self.exposed.get(&key) == Some(&instance.id) {
            self.exposed.remove(&key);
        }
        Some(instance)
    }

    /// Oldest tracked instance on `element`
    pub(crate) fn first_for(&self, element: NodeId) -> Option<&ComponentInstance> {
        self.instances.iter().find(|i| i.element == element)
    }

    /// Check if `element` holds an instance produced by `class_name`
    pub(crate) fn is_tracked(&self, element: NodeId, class_name: &str) -> bool {
        self.instances
            .iter()
            .any(|i| i.element == element && i.config.class_name == class_name)
    }

    pub(crate) fn get(&self, id: InstanceId) -> Option<&ComponentInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: InstanceId) -> Option<&mut ComponentInstance> {
        self.instances.iter_mut().find(|i| i.id == id)
    }

    pub(crate) fn exposed(&self, element: NodeId, class_name: &str) -> Option<InstanceId> {
        self.exposed.get(&(element, class_name.to_owned())).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.instances.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.len()
    }
}
