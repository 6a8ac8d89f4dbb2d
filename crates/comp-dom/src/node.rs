//! Node identities and collections

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a node within one [`Document`](crate::Document)
///
/// Ids are arena indices; they stay valid for the document's lifetime,
/// including while the node is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw arena index
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena index
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of nodes in document order
///
/// Every API that accepts "one node, a list, or a collection" takes
/// `impl Into<NodeList>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeList(Vec<NodeId>);

impl NodeList {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Node at position
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.0.get(index).copied()
    }

    /// Borrow as slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    /// Iterate nodes
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    pub(crate) fn push(&mut self, id: NodeId) {
        self.0.push(id);
    }
}

impl From<NodeId> for NodeList {
    fn from(value: NodeId) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<NodeId>> for NodeList {
    fn from(value: Vec<NodeId>) -> Self {
        Self(value)
    }
}

impl From<&[NodeId]> for NodeList {
    fn from(value: &[NodeId]) -> Self {
        Self(value.to_vec())
    }
}

impl<const N: usize> From<[NodeId; N]> for NodeList {
    fn from(value: [NodeId; N]) -> Self {
        Self(value.to_vec())
    }
}

impl FromIterator<NodeId> for NodeList {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for NodeList {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
