//! Core trait abstractions for XML processing engines.
//!
//! The accessor layer never parses XML or evaluates paths on its own. It
//! drives an engine through the traits defined here: [`XmlTree`] for reading
//! the parsed tree, [`MutableXmlTree`] for point mutations and
//! [`XPathEngine`] for namespace-aware node selection.

pub mod error;
pub mod tree;
pub mod xpath;

pub use error::{Error, Result};
pub use tree::{MutableXmlTree, NodeType, XmlTree};
pub use xpath::XPathEngine;
