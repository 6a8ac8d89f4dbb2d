//! Host capability flags used for feature detection

use serde::{Deserialize, Serialize};

/// APIs the host document advertises
///
/// The handler only upgrades on hosts with class lists, queries and event
/// listeners. The event constructor is optional; events fall back to the
/// legacy create-then-init path without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostCapabilities {
    /// Per-element class list manipulation
    pub class_list: bool,
    /// Selector queries over the document
    pub query_selector: bool,
    /// Event listener registration
    pub event_listener: bool,
    /// Direct event construction with an init dictionary
    pub event_constructor: bool,
}

impl HostCapabilities {
    /// Host with every API available
    #[inline]
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            class_list: true,
            query_selector: true,
            event_listener: true,
            event_constructor: true,
        }
    }

    /// Host without any of the APIs
    #[inline]
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            class_list: false,
            query_selector: false,
            event_listener: false,
            event_constructor: false,
        }
    }

    /// Toggle the event constructor
    #[inline]
    #[must_use]
    pub const fn with_event_constructor(mut self, enabled: bool) -> Self {
        self.event_constructor = enabled;
        self
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::modern()
    }
}
