//! Leaf versus container classification.

use std::collections::BTreeSet;

use xml_engine_traits::XmlTree;

/// Whether `node` is a leaf: an element without element children, or a node
/// that cannot hold children at all (attribute, text).
///
/// Children are looked up once per candidate namespace: the node's own
/// declarations, the document's declarations and the no-namespace view. Any
/// view reporting children makes the node a container.
pub fn is_leaf<E: XmlTree>(engine: &E, node: &E::Node, document_namespaces: &BTreeSet<String>) -> bool {
    let own = engine.declared_namespaces(node);
    let views: BTreeSet<Option<&str>> = own
        .iter()
        .chain(document_namespaces)
        .map(|uri| Some(uri.as_str()))
        .chain(std::iter::once(None))
        .collect();

    for namespace in views {
        match engine.children(node, namespace) {
            None => return true,
            Some(children) if !children.is_empty() => return false,
            Some(_) => {}
        }
    }
    true
}
