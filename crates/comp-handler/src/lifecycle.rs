//! Per-element component lifecycle
//!
//! Each (element, logical name) pair moves independently through
//! `Unupgraded -> Upgrading -> Upgraded`, and a downgrade returns it to
//! `Unupgraded`.

use crate::error::HandlerError;
use serde::Serialize;

/// Upgrade state of one logical name on one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComponentState {
    /// Name absent from the element's marker
    Unupgraded,
    /// Marker written, construction in progress
    Upgrading,
    /// Instance constructed and tracked
    Upgraded,
}

impl ComponentState {
    /// States reachable in one step
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [ComponentState] {
        match self {
            Self::Unupgraded => &[Self::Upgrading],
            Self::Upgrading => &[Self::Upgraded],
            Self::Upgraded => &[Self::Unupgraded],
        }
    }

    /// Move to `to`
    ///
    /// # Errors
    /// Returns [`HandlerError::IllegalTransition`] if `to` is not reachable.
    pub fn transition(self, to: ComponentState) -> Result<ComponentState, HandlerError> {
        if self.allowed_transitions().contains(&to) {
            Ok(to)
        } else {
            Err(HandlerError::IllegalTransition { from: self, to })
        }
    }
}
