//! Lifecycle event factory
//!
//! Builds events through the host's constructor when it has one and falls
//! back to the legacy create-then-init path otherwise.

use crate::config::EventNames;
use comp_dom::{Document, DomError, Event, EventInit};

/// Lifecycle notifications fired on upgraded elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Before an upgrade; listeners may cancel
    Upgrading,
    /// After one component was instantiated
    Upgraded,
    /// After one component was torn down
    Downgraded,
}

impl LifecycleEvent {
    /// Only `Upgrading` can be cancelled
    #[inline]
    #[must_use]
    pub fn cancelable(self) -> bool {
        matches!(self, Self::Upgrading)
    }

    /// Event type name under `names`
    #[must_use]
    pub fn event_type(self, names: &EventNames) -> &str {
        match self {
            Self::Upgrading => &names.upgrading,
            Self::Upgraded => &names.upgraded,
            Self::Downgraded => &names.downgraded,
        }
    }
}

/// Create an event usable with the document's dispatch
///
/// # Errors
/// Fails only if the host supports neither creation path.
pub fn create_event(
    doc: &Document,
    event_type: &str,
    bubbles: bool,
    cancelable: bool,
) -> Result<Event, DomError> {
    match doc.new_event(event_type, EventInit { bubbles, cancelable }) {
        Ok(event) => Ok(event),
        Err(DomError::NotSupported(_)) => {
            let mut event = doc.create_event("Events")?;
            event.init_event(event_type, bubbles, cancelable);
            Ok(event)
        }
        Err(e) => Err(e),
    }
}

/// Create a lifecycle event; all of them bubble
///
/// # Errors
/// See [`create_event`].
pub fn lifecycle_event(
    doc: &Document,
    names: &EventNames,
    kind: LifecycleEvent,
) -> Result<Event, DomError> {
    create_event(doc, kind.event_type(names), true, kind.cancelable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use comp_dom::HostCapabilities;

    #[test]
    fn modern_host_constructs_directly() {
        let doc = Document::new();
        let ev = create_event(&doc, "x", true, true).unwrap();
        assert_eq!(ev.event_type(), "x");
        assert!(ev.bubbles());
        assert!(ev.cancelable());
        assert!(ev.is_initialized());
    }

    #[test]
    fn legacy_host_falls_back_to_init() {
        let legacy = Document::with_capabilities(HostCapabilities::modern().with_event_constructor(false));
        let modern = Document::new();

        let a = create_event(&legacy, "done", true, false).unwrap();
        let b = create_event(&modern, "done", true, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn upgrading_is_the_only_cancelable_event() {
        let doc = Document::new();
        let names = EventNames::default();

        let upgrading = lifecycle_event(&doc, &names, LifecycleEvent::Upgrading).unwrap();
        let upgraded = lifecycle_event(&doc, &names, LifecycleEvent::Upgraded).unwrap();
        let downgraded = lifecycle_event(&doc, &names, LifecycleEvent::Downgraded).unwrap();

        assert!(upgrading.cancelable());
        assert!(!upgraded.cancelable());
        assert!(!downgraded.cancelable());
        assert!(upgrading.bubbles() && upgraded.bubbles() && downgraded.bubbles());
        assert_eq!(downgraded.event_type(), "mdl-componentdowngraded");
    }
}
