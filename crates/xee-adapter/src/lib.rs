//! xee engine adapter for the XML accessor layer
//!
//! This adapter implements the xml-engine-traits interfaces on top of the xot
//! tree library (parsing, navigation, mutation, serialization) and the xee
//! XPath 3.1 engine (node selection with namespace bindings).

pub mod tree;
pub mod xpath;

// Re-export main types
pub use xpath::XeeEngine;

// Re-export key types for convenience
pub use xee_xpath::DocumentHandle;
pub use xot::Node;
