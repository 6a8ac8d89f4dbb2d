//! Per-element upgrade marker
//!
//! Provides [`UpgradeMarker`], the ordered set of logical component names
//! already applied to an element.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Attribute name under which the marker is observable
pub const UPGRADED_ATTRIBUTE: &str = "data-upgraded";

/// Ordered set of logical names applied to one element
///
/// Elements rarely carry more than a couple of components, so membership is a
/// linear scan over inline storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpgradeMarker {
    names: SmallVec<[String; 2]>,
}

impl UpgradeMarker {
    /// Create empty marker
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the comma-joined attribute form
    ///
    /// Empty entries are dropped, so `""` and `",Button"` normalize to the
    /// empty set and `{Button}` respectively. Repeated names keep their first
    /// position.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut marker = Self::new();
        for name in value.split(',').map(str::trim) {
            marker.insert(name);
        }
        marker
    }

    /// Check whether `name` has been applied
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Append `name` if absent
    ///
    /// Returns `true` if the marker changed.
    pub fn insert(&mut self, name: &str) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_owned());
        true
    }

    /// Remove `name` if present
    ///
    /// Returns `true` if the marker changed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(idx) => {
                self.names.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Number of applied names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no names are applied
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate names in application order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Render the comma-joined attribute form
    #[must_use]
    pub fn to_attribute(&self) -> String {
        self.names.join(",")
    }
}

impl fmt::Display for UpgradeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attribute())
    }
}

impl<'a> FromIterator<&'a str> for UpgradeMarker {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut marker = Self::new();
        for name in iter {
            marker.insert(name);
        }
        marker
    }
}
