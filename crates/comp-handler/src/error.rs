//! Error types for the component handler
//!
//! Every variant is a programmer error: it surfaces immediately and is never
//! retried. Soft conditions (unknown callback targets, degraded hosts,
//! already-upgraded elements) do not produce errors at all.

use crate::lifecycle::ComponentState;
use comp_dom::{DomError, NodeId};

/// Main handler error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// Upgrade target is not an element of the document
    #[error("invalid argument provided to upgrade element: {0} is not an element")]
    InvalidElement(NodeId),

    /// Another descriptor already uses this marker class
    #[error("the provided css class has already been registered: {0}")]
    DuplicateCssClass(String),

    /// Another descriptor already uses this logical name
    #[error("the provided class name has already been registered: {0}")]
    DuplicateClassName(String),

    /// Constructor exposes the reserved bookkeeping member
    #[error("component {class_name} must not define `{property}` as a member")]
    ReservedProperty {
        /// Logical name being registered
        class_name: String,
        /// Reserved member name
        property: String,
    },

    /// No descriptor for the requested logical name
    #[error("unable to find a registered component for the given class: {0}")]
    ComponentNotFound(String),

    /// Downgrade target is not a node of the document
    #[error("invalid argument provided to downgrade nodes: {0} is not a node")]
    InvalidNode(NodeId),

    /// Lifecycle step out of order
    #[error("illegal lifecycle transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// State before the step
        from: ComponentState,
        /// Requested state
        to: ComponentState,
    },

    /// Host document rejected an operation
    #[error("document error: {0}")]
    Dom(#[from] DomError),
}

impl HandlerError {
    /// Check if error was raised by `register`
    #[inline]
    #[must_use]
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateCssClass(_) | Self::DuplicateClassName(_) | Self::ReservedProperty { .. }
        )
    }

    /// Check if error names a bad element or node argument
    #[inline]
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidElement(_) | Self::InvalidNode(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = HandlerError> = std::result::Result<T, E>;
