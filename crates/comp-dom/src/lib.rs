//! Component Host Document
//!
//! In-memory document the component handler upgrades.
//!
//! # Overview
//!
//! - [`Document`]: arena of elements and text nodes addressed by [`NodeId`]
//! - [`UpgradeMarker`]: per-element set of applied component names
//! - [`Event`]: cancelable, bubbling events with listener dispatch
//! - [`HostCapabilities`]: API flags used for feature detection
//! - [`ElementSpec`]: JSON tree form for loading and snapshotting
//!
//! # Example
//!
//! ```rust
//! use comp_dom::{Document, EventInit};
//!
//! let mut doc = Document::new();
//! let menu = doc.create_element("ul");
//! doc.add_class(menu, "mdl-menu").unwrap();
//! doc.append_child(doc.root(), menu).unwrap();
//!
//! assert_eq!(doc.query_by_class("mdl-menu").len(), 1);
//!
//! let mut ev = doc.new_event("ping", EventInit { bubbles: true, cancelable: true }).unwrap();
//! assert!(doc.dispatch_event(menu, &mut ev).unwrap());
//! ```

#![warn(missing_docs)]

pub mod capabilities;
pub mod document;
pub mod error;
pub mod event;
pub mod marker;
pub mod node;
pub mod tree;

// Re-exports
pub use capabilities::HostCapabilities;
pub use document::Document;
pub use error::DomError;
pub use event::{Event, EventInit, Listener, ListenerId};
pub use marker::{UpgradeMarker, UPGRADED_ATTRIBUTE};
pub use node::{NodeId, NodeList};
pub use tree::{ElementSpec, NodeSpec};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
