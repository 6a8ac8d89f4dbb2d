//! Handler configuration

use serde::{Deserialize, Serialize};

/// Lifecycle event type names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventNames {
    /// Fired before an upgrade; cancelable
    pub upgrading: String,
    /// Fired after each instantiation
    pub upgraded: String,
    /// Fired after each teardown
    pub downgraded: String,
}

impl Default for EventNames {
    fn default() -> Self {
        Self {
            upgrading: "mdl-componentupgrading".to_owned(),
            upgraded: "mdl-componentupgraded".to_owned(),
            downgraded: "mdl-componentdowngraded".to_owned(),
        }
    }
}

/// Component handler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Lifecycle event names
    pub events: EventNames,
    /// Class added to the document element once the host passes feature
    /// detection
    pub capability_class: String,
}

impl HandlerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With capability class
    #[inline]
    #[must_use]
    pub fn with_capability_class(mut self, class: impl Into<String>) -> Self {
        self.capability_class = class.into();
        self
    }

    /// With event names
    #[inline]
    #[must_use]
    pub fn with_event_names(mut self, events: EventNames) -> Self {
        self.events = events;
        self
    }

    /// Parse from JSON; missing fields take defaults
    ///
    /// # Errors
    /// Returns the decoder error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            events: EventNames::default(),
            capability_class: "mdl-js".to_owned(),
        }
    }
}
