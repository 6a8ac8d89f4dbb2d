//! Registry of component descriptors
//!
//! Provides [`ComponentRegistry`]: an ordered list of descriptors, unique by
//! logical name and by marker class. Registration order is observable; a full
//! upgrade pass applies descriptors in this order.

use crate::error::HandlerError;
use crate::instance::{Widget, WidgetConstructor, RESERVED_CONFIG_PROPERTY};
use comp_dom::{Document, NodeId};
use std::fmt;
use std::sync::Arc;

/// Callback run with each newly upgraded element
pub type UpgradeCallback = Arc<dyn Fn(&mut Document, NodeId) + Send + Sync>;

/// Registration request from a widget module
#[derive(Debug, Clone)]
pub struct ComponentConfig {
    /// Widget constructor
    pub constructor: WidgetConstructor,
    /// Logical name
    pub class_as_string: String,
    /// Marker class
    pub css_class: String,
    /// Expose instances through the widget table; `None` means `true`
    pub widget: Option<bool>,
}

impl ComponentConfig {
    /// Create config with the widget flag left at its default
    pub fn new(
        class_as_string: impl Into<String>,
        css_class: impl Into<String>,
        constructor: WidgetConstructor,
    ) -> Self {
        Self {
            constructor,
            class_as_string: class_as_string.into(),
            css_class: css_class.into(),
            widget: None,
        }
    }

    /// Set the widget flag explicitly
    #[inline]
    #[must_use]
    pub fn widget(mut self, widget: bool) -> Self {
        self.widget = Some(widget);
        self
    }

    /// Config for a typed [`Component`]
    #[must_use]
    pub fn of<C: Component>() -> Self {
        Self {
            constructor: WidgetConstructor::new(C::upgrade).with_members(C::MEMBERS.iter().copied()),
            class_as_string: C::CLASS_AS_STRING.to_owned(),
            css_class: C::CSS_CLASS.to_owned(),
            widget: C::WIDGET,
        }
    }
}

/// Widget type that describes its own registration
pub trait Component: Widget + Sized {
    /// Logical name
    const CLASS_AS_STRING: &'static str;
    /// Marker class
    const CSS_CLASS: &'static str;
    /// Public member names
    const MEMBERS: &'static [&'static str] = &[];
    /// Widget flag; `None` means `true`
    const WIDGET: Option<bool> = None;

    /// Construct on `element`
    fn upgrade(doc: &mut Document, element: NodeId) -> Self;
}

/// Registered widget type
#[derive(Clone)]
pub struct ComponentDescriptor {
    class_name: String,
    css_class: String,
    constructor: WidgetConstructor,
    widget: bool,
    callbacks: Vec<UpgradeCallback>,
}

impl ComponentDescriptor {
    /// Build a descriptor; the widget flag defaults to `true`
    #[must_use]
    pub fn from_config(config: ComponentConfig) -> Self {
        Self {
            class_name: config.class_as_string,
            css_class: config.css_class,
            constructor: config.constructor,
            widget: config.widget.unwrap_or(true),
            callbacks: Vec::new(),
        }
    }

    /// Logical name
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Marker class
    #[inline]
    #[must_use]
    pub fn css_class(&self) -> &str {
        &self.css_class
    }

    /// Constructor
    #[inline]
    #[must_use]
    pub fn constructor(&self) -> &WidgetConstructor {
        &self.constructor
    }

    /// Whether instances are exposed through the widget table
    #[inline]
    #[must_use]
    pub fn is_widget(&self) -> bool {
        self.widget
    }

    /// Upgrade callbacks in registration order
    #[inline]
    #[must_use]
    pub fn callbacks(&self) -> &[UpgradeCallback] {
        &self.callbacks
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("class_name", &self.class_name)
            .field("css_class", &self.css_class)
            .field("widget", &self.widget)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Ordered descriptor store
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    components: Vec<ComponentDescriptor>,
}

impl ComponentRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// First descriptor with `class_name`
    #[must_use]
    pub fn find(&self, class_name: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.class_name == class_name)
    }

    /// Slot holding `class_name`, for in-place replacement
    pub fn find_mut(&mut self, class_name: &str) -> Option<&mut ComponentDescriptor> {
        self.components.iter_mut().find(|c| c.class_name == class_name)
    }

    /// Descriptor using `css_class`
    #[must_use]
    pub fn find_by_css_class(&self, css_class: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.css_class == css_class)
    }

    /// Position of `class_name` in registration order
    #[must_use]
    pub fn position(&self, class_name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.class_name == class_name)
    }

    /// Descriptor at position
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ComponentDescriptor> {
        self.components.get(index)
    }

    /// Append without checks
    pub fn add(&mut self, descriptor: ComponentDescriptor) {
        self.components.push(descriptor);
    }

    /// Register a widget type
    ///
    /// Existing descriptors are checked in order, marker class before logical
    /// name for each. A failed registration leaves the registry unchanged.
    ///
    /// # Errors
    /// - [`HandlerError::DuplicateCssClass`] if the marker class is taken
    /// - [`HandlerError::DuplicateClassName`] if the logical name is taken
    /// - [`HandlerError::ReservedProperty`] if the constructor declares
    ///   [`RESERVED_CONFIG_PROPERTY`]
    pub fn register(&mut self, config: ComponentConfig) -> Result<(), HandlerError> {
        let descriptor = ComponentDescriptor::from_config(config);

        for existing in &self.components {
            if existing.css_class == descriptor.css_class {
                return Err(HandlerError::DuplicateCssClass(existing.css_class.clone()));
            }
            if existing.class_name == descriptor.class_name {
                return Err(HandlerError::DuplicateClassName(existing.class_name.clone()));
            }
        }

        if descriptor.constructor.defines_member(RESERVED_CONFIG_PROPERTY) {
            return Err(HandlerError::ReservedProperty {
                class_name: descriptor.class_name,
                property: RESERVED_CONFIG_PROPERTY.to_owned(),
            });
        }

        tracing::debug!(
            class_name = %descriptor.class_name,
            css_class = %descriptor.css_class,
            widget = descriptor.widget,
            "registered component"
        );

        // Replace in place if the name already has a slot.
        match self.find_mut(&descriptor.class_name) {
            Some(slot) => *slot = descriptor,
            None => self.add(descriptor),
        }
        Ok(())
    }

    /// Append an upgrade callback; returns `false` for unknown names
    pub fn register_upgraded_callback(&mut self, class_name: &str, callback: UpgradeCallback) -> bool {
        match self.find_mut(class_name) {
            Some(descriptor) => {
                descriptor.callbacks.push(callback);
                true
            }
            None => {
                tracing::debug!(class_name, "upgrade callback for unknown component ignored");
                false
            }
        }
    }

    /// Iterate descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.components.iter()
    }

    /// Logical names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.class_name.as_str()).collect()
    }

    /// Check if `class_name` is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, class_name: &str) -> bool {
        self.find(class_name).is_some()
    }

    /// Number of descriptors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(name: &str, css: &str) -> ComponentConfig {
        ComponentConfig::new(name, css, WidgetConstructor::new(|_doc, _el| ()))
    }

    struct Ripple;

    impl Component for Ripple {
        const CLASS_AS_STRING: &'static str = "MaterialRipple";
        const CSS_CLASS: &'static str = "mdl-js-ripple-effect";
        const WIDGET: Option<bool> = Some(false);

        fn upgrade(_doc: &mut Document, _element: NodeId) -> Self {
            Ripple
        }
    }

    #[test]
    fn registry_new_empty() {
        let registry = ComponentRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn register_preserves_order() {
        let mut registry = ComponentRegistry::new();
        registry.register(config("B", "b")).unwrap();
        registry.register(config("A", "a")).unwrap();
        assert_eq!(registry.names(), vec!["B", "A"]);
        assert_eq!(registry.position("A"), Some(1));
    }

    #[test]
    fn widget_flag_defaults_true() {
        let mut registry = ComponentRegistry::new();
        registry.register(config("A", "a")).unwrap();
        registry.register(config("B", "b").widget(false)).unwrap();
        registry.register(config("C", "c").widget(true)).unwrap();
        assert!(registry.find("A").unwrap().is_widget());
        assert!(!registry.find("B").unwrap().is_widget());
        assert!(registry.find("C").unwrap().is_widget());
    }

    #[test]
    fn duplicate_css_class_rejected() {
        let mut registry = ComponentRegistry::new();
        registry.register(config("A", "a")).unwrap();
        let err = registry.register(config("Other", "a")).unwrap_err();
        assert_eq!(err, HandlerError::DuplicateCssClass("a".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_class_name_rejected() {
        let mut registry = ComponentRegistry::new();
        registry.register(config("A", "a")).unwrap();
        let err = registry.register(config("A", "other")).unwrap_err();
        assert_eq!(err, HandlerError::DuplicateClassName("A".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn css_class_checked_before_class_name() {
        let mut registry = ComponentRegistry::new();
        registry.register(config("A", "a")).unwrap();
        let err = registry.register(config("A", "a")).unwrap_err();
        assert!(matches!(err, HandlerError::DuplicateCssClass(_)));
    }

    #[test]
    fn reserved_member_rejected() {
        let mut registry = ComponentRegistry::new();
        let ctor = WidgetConstructor::new(|_doc, _el| ()).with_members([RESERVED_CONFIG_PROPERTY]);
        let err = registry.register(ComponentConfig::new("A", "a", ctor)).unwrap_err();
        assert!(matches!(err, HandlerError::ReservedProperty { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn find_mut_replaces_in_place() {
        let mut registry = ComponentRegistry::new();
        registry.register(config("A", "a")).unwrap();
        registry.register(config("B", "b")).unwrap();

        let replacement = ComponentDescriptor::from_config(config("A", "a2").widget(false));
        *registry.find_mut("A").unwrap() = replacement;

        assert_eq!(registry.names(), vec!["A", "B"]);
        assert_eq!(registry.find("A").unwrap().css_class(), "a2");
        assert!(registry.find_by_css_class("a").is_none());
    }

    #[test]
    fn upgraded_callback_unknown_is_noop() {
        let mut registry = ComponentRegistry::new();
        registry.register(config("A", "a")).unwrap();
        assert!(!registry.register_upgraded_callback("Missing", Arc::new(|_doc: &mut Document, _el: NodeId| {})));
        assert!(registry.register_upgraded_callback("A", Arc::new(|_doc: &mut Document, _el: NodeId| {})));
        assert_eq!(registry.find("A").unwrap().callbacks().len(), 1);
    }

    #[test]
    fn typed_component_config() {
        let mut registry = ComponentRegistry::new();
        registry.register(ComponentConfig::of::<Ripple>()).unwrap();
        let descriptor = registry.find_by_css_class("mdl-js-ripple-effect").unwrap();
        assert_eq!(descriptor.class_name(), "MaterialRipple");
        assert!(!descriptor.is_widget());
    }

    proptest! {
        #[test]
        fn prop_duplicates_always_rejected(
            names in proptest::collection::vec("[A-D]", 1..8),
            classes in proptest::collection::vec("[a-d]", 1..8),
        ) {
            let mut registry = ComponentRegistry::new();
            for (name, css) in names.iter().zip(classes.iter()) {
                let before = registry.len();
                let clash = registry.iter().any(|d| d.class_name() == name || d.css_class() == css);
                let res = registry.register(config(name, css));
                prop_assert_eq!(res.is_err(), clash);
                prop_assert_eq!(registry.len(), if clash { before } else { before + 1 });
            }
        }
    }
}
