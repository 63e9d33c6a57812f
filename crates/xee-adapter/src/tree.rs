//! XmlTree and MutableXmlTree implementations for the xot arena held by xee

use tracing::{debug, trace};
use xee_xpath::{DocumentHandle, Documents};
use xml_engine_traits::{
    error::{Error, Result},
    tree::{MutableXmlTree, NodeType, XmlTree},
};
use xot::{Node, Value, ValueType, Xot};

use crate::xpath::XeeEngine;

impl XeeEngine {
    fn document_node(&self, doc: &DocumentHandle) -> Result<Node> {
        self.documents
            .document_node(*doc)
            .ok_or_else(|| Error::node_access(format!("Unknown document handle {:?}", doc)))
    }

    fn element_namespace(xot: &Xot, node: Node) -> Option<&str> {
        match xot.value(node) {
            Value::Element(element) => Some(xot.name_ns_str(element.name()).1),
            _ => None,
        }
    }
}

impl XmlTree for XeeEngine {
    type Node = Node;
    type Document = DocumentHandle;

    fn parse_xml(&mut self, xml: &str) -> Result<Self::Document> {
        let handle = self
            .documents
            .add_string_without_uri(xml)
            .map_err(|e| Error::xml_parse(&e))?;
        debug!(bytes = xml.len(), "document loaded into xee");
        Ok(handle)
    }

    fn document_element(&self, doc: &Self::Document) -> Result<Self::Node> {
        let root = self.document_node(doc)?;
        let xot = self.documents.xot();
        xot.children(root)
            .find(|child| xot.is_element(*child))
            .ok_or_else(|| Error::node_access("Document has no root element"))
    }

    fn children(&self, node: &Self::Node, namespace: Option<&str>) -> Option<Vec<Self::Node>> {
        let xot = self.documents.xot();
        if !self.node_type(node).is_container() {
            return None;
        }
        // xot stores "no namespace" as the empty URI
        let wanted = namespace.unwrap_or("");
        Some(
            xot.children(*node)
                .filter(|child| Self::element_namespace(xot, *child) == Some(wanted))
                .collect(),
        )
    }

    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)> {
        let xot = self.documents.xot();
        if !xot.is_element(*node) {
            return Vec::new();
        }
        xot.attributes(*node)
            .iter()
            .map(|(name, value)| {
                let name = name.clone();
                (xot.name_ns_str(name).0.to_string(), value.to_string())
            })
            .collect()
    }

    fn node_local_name(&self, node: &Self::Node) -> Option<String> {
        let xot = self.documents.xot();
        xot.node_name(*node)
            .map(|name| xot.name_ns_str(name).0.to_string())
    }

    fn node_namespace_uri(&self, node: &Self::Node) -> Option<String> {
        let xot = self.documents.xot();
        xot.node_name(*node)
            .map(|name| xot.name_ns_str(name).1)
            .filter(|uri| !uri.is_empty())
            .map(str::to_string)
    }

    fn node_type(&self, node: &Self::Node) -> NodeType {
        match self.documents.xot().value_type(*node) {
            ValueType::Document => NodeType::Document,
            ValueType::Element => NodeType::Element,
            ValueType::Text => NodeType::Text,
            ValueType::Comment => NodeType::Comment,
            ValueType::ProcessingInstruction => NodeType::ProcessingInstruction,
            ValueType::Attribute => NodeType::Attribute,
            ValueType::Namespace => NodeType::Namespace,
        }
    }

    fn text(&self, node: &Self::Node) -> Option<String> {
        let xot = self.documents.xot();
        match xot.value(*node) {
            Value::Text(text) => Some(text.get().to_string()),
            Value::Attribute(attribute) => Some(attribute.value().to_string()),
            Value::Element(_) => {
                let mut content: Option<String> = None;
                for child in xot.children(*node) {
                    if let Value::Text(text) = xot.value(child) {
                        content.get_or_insert_with(String::new).push_str(text.get());
                    }
                }
                content
            }
            _ => None,
        }
    }

    fn declared_namespaces(&self, node: &Self::Node) -> Vec<String> {
        let xot = self.documents.xot();
        if !xot.is_element(*node) {
            return Vec::new();
        }
        xot.namespaces(*node)
            .values()
            .map(|namespace| xot.namespace_str(namespace.clone()).to_string())
            .filter(|uri| !uri.is_empty())
            .collect()
    }

    fn serialize(&self, node: &Self::Node) -> Result<String> {
        self.documents
            .xot()
            .to_string(*node)
            .map_err(|e| Error::Serialize(e.to_string()))
    }

    fn serialize_document(&self, doc: &Self::Document) -> Result<String> {
        let root = self.document_node(doc)?;
        self.serialize(&root)
    }
}

impl MutableXmlTree for XeeEngine {
    fn append_element(
        &mut self,
        parent: &Self::Node,
        name: &str,
        namespace: Option<&str>,
        text: Option<&str>,
    ) -> Result<Self::Node> {
        let xot = self.documents.xot_mut();
        let (name_id, undeclared) = match namespace {
            Some(uri) => {
                let namespace_id = xot.add_namespace(uri);
                let in_scope = xot.prefix_for_namespace(*parent, namespace_id).is_some();
                (
                    xot.add_name_ns(name, namespace_id),
                    (!in_scope).then_some(namespace_id),
                )
            }
            None => (xot.add_name(name), None),
        };
        let element = xot.new_element(name_id);
        if let Some(namespace_id) = undeclared {
            let prefix = xot.empty_prefix();
            xot.namespaces_mut(element).insert(prefix, namespace_id);
            debug!(name, "namespace declared on appended element");
        }
        xot.append(*parent, element)
            .map_err(|e| Error::Mutation(e.to_string()))?;
        if let Some(text) = text {
            let text_node = xot.new_text(text);
            xot.append(element, text_node)
                .map_err(|e| Error::Mutation(e.to_string()))?;
        }
        trace!(name, namespace = namespace.unwrap_or(""), "element appended");
        Ok(element)
    }

    fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<()> {
        let xot = self.documents.xot_mut();
        if !xot.is_element(*element) {
            return Err(Error::Mutation(format!(
                "Cannot set attribute \"{}\" on a non-element node",
                name
            )));
        }
        let name_id = xot.add_name(name);
        xot.attributes_mut(*element).insert(name_id, value.to_string());
        Ok(())
    }

    fn detach(&mut self, node: &Self::Node) -> Result<()> {
        let xot = self.documents.xot_mut();
        if let Value::Attribute(attribute) = xot.value(*node) {
            let name_id = attribute.name();
            let owner = xot
                .parent(*node)
                .ok_or_else(|| Error::Mutation("Attribute has no owner element".to_string()))?;
            xot.attributes_mut(owner).remove(name_id);
            return Ok(());
        }
        xot.remove(*node).map_err(|e| Error::Mutation(e.to_string()))
    }

    fn reload(&mut self, xml: &str) -> Result<Self::Document> {
        // xee indexes a document when it is added; a fresh arena is what
        // makes appended nodes queryable.
        let mut documents = Documents::new();
        let handle = documents
            .add_string_without_uri(xml)
            .map_err(|e| Error::xml_parse(&e))?;
        self.documents = documents;
        debug!(bytes = xml.len(), "document re-indexed");
        Ok(handle)
    }
}
