//! Error types for the host document

use crate::node::NodeId;

/// Errors raised by [`Document`](crate::Document) operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not belong to this document
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Operation requires an element but got another node kind
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Insertion would create a cycle or append a node to itself
    #[error("hierarchy request error: cannot insert {child} under {parent}")]
    HierarchyRequest {
        /// Prospective parent
        parent: NodeId,
        /// Node being inserted
        child: NodeId,
    },

    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// Expected parent
        parent: NodeId,
        /// Node being removed
        child: NodeId,
    },

    /// Host lacks the requested API
    #[error("not supported by this host: {0}")]
    NotSupported(&'static str),

    /// Generic event dispatched before `init_event`
    #[error("event has not been initialized")]
    UninitializedEvent,

    /// Document tree could not be decoded
    #[error("invalid document tree: {0}")]
    InvalidTree(String),
}
