//! Host events and listener registration

use crate::node::NodeId;

/// Flags for constructing an event in one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventInit {
    /// Propagate to ancestors after the target
    pub bubbles: bool,
    /// Listeners may prevent the default action
    pub cancelable: bool,
}

/// Event dispatched through a [`Document`](crate::Document)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    initialized: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
}

impl Event {
    pub(crate) fn construct(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_owned(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            initialized: true,
            default_prevented: false,
            propagation_stopped: false,
            target: None,
            current_target: None,
        }
    }

    pub(crate) fn generic() -> Self {
        Self {
            initialized: false,
            ..Self::construct("", EventInit::default())
        }
    }

    /// Initialize a generic event (legacy creation path)
    pub fn init_event(&mut self, event_type: &str, bubbles: bool, cancelable: bool) {
        event_type.clone_into(&mut self.event_type);
        self.bubbles = bubbles;
        self.cancelable = cancelable;
        self.initialized = true;
        self.default_prevented = false;
        self.propagation_stopped = false;
    }

    /// Event type name
    #[inline]
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Whether the event propagates to ancestors
    #[inline]
    #[must_use]
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Whether listeners may cancel the event
    #[inline]
    #[must_use]
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Whether the event is ready for dispatch
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a listener cancelled the event
    #[inline]
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Cancel the event; ignored for non-cancelable events
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation to further ancestors
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether propagation was stopped
    #[inline]
    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Node the event was dispatched to
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Node whose listeners are currently running
    #[inline]
    #[must_use]
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub(crate) fn begin_dispatch(&mut self, target: NodeId) {
        self.target = Some(target);
        self.propagation_stopped = false;
    }

    pub(crate) fn set_current_target(&mut self, node: Option<NodeId>) {
        self.current_target = node;
    }
}

/// Listener callback
pub type Listener = Box<dyn FnMut(&mut Event) + Send>;

/// Handle returned by [`Document::add_event_listener`](crate::Document::add_event_listener)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

pub(crate) struct Registration {
    pub(crate) id: ListenerId,
    pub(crate) event_type: String,
    pub(crate) listener: Listener,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}
