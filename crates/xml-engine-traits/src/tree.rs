//! XML tree abstraction trait

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// Processing instruction node
    ProcessingInstruction,
    /// Namespace node
    Namespace,
}

impl NodeType {
    /// Whether nodes of this type can hold element children
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::Document | NodeType::Element)
    }
}

/// Trait for XML tree implementations.
///
/// This trait abstracts over different XML tree representations, so the
/// accessor layer can navigate a parsed document without knowing which
/// library produced it.
pub trait XmlTree {
    /// Type representing a node handle in this tree
    type Node: Clone + PartialEq + Debug;

    /// Type representing a document handle in this tree
    type Document: Clone + Debug;

    /// Parse XML from a string and return a document handle.
    ///
    /// Fails with [`Error::XmlParse`](crate::Error::XmlParse) carrying every
    /// diagnostic the parser produced.
    fn parse_xml(&mut self, xml: &str) -> Result<Self::Document>;

    /// Get the document element (root element) of a document
    fn document_element(&self, doc: &Self::Document) -> Result<Self::Node>;

    /// Get the element children of a node that live in `namespace`
    /// (`None` selects elements in no namespace).
    ///
    /// Returns `None` when the node cannot hold children at all, such as an
    /// attribute or a text node.
    fn children(&self, node: &Self::Node, namespace: Option<&str>) -> Option<Vec<Self::Node>>;

    /// Get all attributes of an element node as (name, value) pairs, in
    /// document order
    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

    /// Get the local name of a node (without namespace prefix)
    fn node_local_name(&self, node: &Self::Node) -> Option<String>;

    /// Get the namespace URI of a node
    fn node_namespace_uri(&self, node: &Self::Node) -> Option<String>;

    /// Get the type of a node
    fn node_type(&self, node: &Self::Node) -> NodeType;

    /// Get the scalar text of a node.
    ///
    /// For elements this is the concatenation of the direct text children,
    /// or `None` when there are none. Attributes and text nodes return their
    /// value.
    fn text(&self, node: &Self::Node) -> Option<String>;

    /// Get the namespace URIs declared on this node itself (not inherited)
    fn declared_namespaces(&self, node: &Self::Node) -> Vec<String>;

    /// Serialize a node to an XML string
    fn serialize(&self, node: &Self::Node) -> Result<String>;

    /// Serialize a document to an XML string
    fn serialize_document(&self, doc: &Self::Document) -> Result<String>;
}

/// Helper trait for trees that need mutable access
pub trait MutableXmlTree: XmlTree {
    /// Append a new element named `name` in `namespace` to `parent`, with an
    /// optional text child.
    ///
    /// When no prefix for `namespace` is in scope at `parent`, the new
    /// element declares it as its default namespace.
    fn append_element(
        &mut self,
        parent: &Self::Node,
        name: &str,
        namespace: Option<&str>,
        text: Option<&str>,
    ) -> Result<Self::Node>;

    /// Set an unprefixed attribute on an element
    fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<()>;

    /// Detach a node (and its subtree) from its parent
    fn detach(&mut self, node: &Self::Node) -> Result<()>;

    /// Replace the tree held by this engine with the document parsed from
    /// `xml`. Every node handle obtained before the call is invalidated.
    fn reload(&mut self, xml: &str) -> Result<Self::Document>;

    /// Make pending mutations of `doc` visible to path queries.
    ///
    /// Returns the handle to use for the document from now on. Node handles
    /// obtained before the call must not be used afterwards.
    fn commit(&mut self, doc: &Self::Document) -> Result<Self::Document> {
        let xml = self.serialize_document(doc)?;
        self.reload(&xml)
    }
}
