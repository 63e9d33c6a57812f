//! Path resolution against a context node.

use tracing::trace;
use xml_engine_traits::XPathEngine;

use crate::namespace::NamespaceTable;

/// Outcome of resolving a path expression.
///
/// The resolver applies no policy: existence checks accept both `Singular`
/// and `Multiple`, scalar extraction rejects everything but `Singular`.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<N> {
    /// The expression failed to compile or evaluate
    SyntaxError(String),
    /// No node matched
    Empty,
    /// Exactly one node matched
    Singular(N),
    /// More than one node matched, in document order
    Multiple(Vec<N>),
}

impl<N> Resolution<N> {
    fn from_nodes(mut nodes: Vec<N>) -> Self {
        match nodes.len() {
            0 => Resolution::Empty,
            1 => Resolution::Singular(nodes.remove(0)),
            _ => Resolution::Multiple(nodes),
        }
    }

    /// Whether at least one node matched
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Singular(_) | Resolution::Multiple(_))
    }

    /// Number of matched nodes
    pub fn len(&self) -> usize {
        match self {
            Resolution::SyntaxError(_) | Resolution::Empty => 0,
            Resolution::Singular(_) => 1,
            Resolution::Multiple(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matched nodes, empty for `SyntaxError` and `Empty`
    pub fn into_nodes(self) -> Vec<N> {
        match self {
            Resolution::SyntaxError(_) | Resolution::Empty => Vec::new(),
            Resolution::Singular(node) => vec![node],
            Resolution::Multiple(nodes) => nodes,
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            Resolution::SyntaxError(_) => "syntax-error",
            Resolution::Empty => "empty",
            Resolution::Singular(_) => "singular",
            Resolution::Multiple(_) => "multiple",
        }
    }
}

/// Resolve `path` against `node` using the bindings in `namespaces`.
///
/// An absent path stands for the node itself and never reaches the engine.
pub fn resolve<E: XPathEngine>(
    engine: &mut E,
    node: &E::Node,
    path: Option<&str>,
    namespaces: &NamespaceTable,
) -> Resolution<E::Node> {
    let Some(path) = path else {
        return Resolution::Singular(node.clone());
    };

    let resolution = match engine.select(node, path, &namespaces.as_pairs()) {
        Ok(nodes) => Resolution::from_nodes(nodes),
        Err(err) => Resolution::SyntaxError(err.to_string()),
    };
    trace!(
        path,
        outcome = resolution.outcome(),
        matches = resolution.len(),
        "path resolved"
    );
    resolution
}
