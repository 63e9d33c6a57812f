//! Typed read access to one node of a parsed document.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use tracing::debug;
use xee_adapter::XeeEngine;
use xml_engine_traits::XPathEngine;

use crate::classifier::is_leaf;
use crate::document::load;
use crate::error::{Error, Result};
use crate::namespace::{NamespaceScope, NamespaceTable};
use crate::options::ReaderOptions;
use crate::resolver::{self, Resolution};
use crate::scalar::{excerpt, parse_boolean, parse_integer};

/// How self-access (no path) is shown in error messages
const SELF_PATH: &str = ".";

const EXCERPT_CHARS: usize = 200;

/// Read accessor over one node of a parsed document.
///
/// A reader is a view: readers derived from the same document through
/// [`get_collection`](Reader::get_collection) share the parsed tree and its
/// declared namespaces, while each keeps its own [`NamespaceTable`].
///
/// ```
/// use xml_accessor::Reader;
///
/// let xml = r#"<shelf xmlns="urn:shelf"><book year="2005">Dune</book></shelf>"#;
/// let reader = Reader::create(xml, Some("urn:shelf"), Some("s"))?;
///
/// assert!(reader.has_node("/s:shelf/s:book")?);
/// assert_eq!(reader.get_string("s:book")?, "Dune");
/// assert_eq!(reader.get_int("s:book/@year")?, 2005);
/// # Ok::<(), xml_accessor::Error>(())
/// ```
pub struct Reader<E: XPathEngine = XeeEngine> {
    engine: Rc<RefCell<E>>,
    node: E::Node,
    declared: Rc<BTreeSet<String>>,
    namespaces: NamespaceTable,
}

impl Reader<XeeEngine> {
    /// Parse `xml` and return a reader on its document element.
    ///
    /// When `namespace` is given it must be declared in the document and
    /// `prefix` must be given too; the prefix is then registered on the root
    /// reader.
    pub fn create(xml: &str, namespace: Option<&str>, prefix: Option<&str>) -> Result<Self> {
        Self::with_options(xml, &ReaderOptions::from_parts(namespace, prefix))
    }

    /// Parse `xml` with the bindings in `options`
    pub fn with_options(xml: &str, options: &ReaderOptions) -> Result<Self> {
        Self::with_engine(XeeEngine::new(), xml, options)
    }
}

impl<E: XPathEngine> Reader<E> {
    /// Parse `xml` into `engine` and return a reader on its document element
    pub fn with_engine(mut engine: E, xml: &str, options: &ReaderOptions) -> Result<Self> {
        let loaded = load(&mut engine, xml, options)?;
        let node = engine.document_element(&loaded.document)?;
        Ok(Self::from_parts(engine, node, loaded.declared, loaded.namespaces))
    }

    pub(crate) fn from_parts(
        engine: E,
        node: E::Node,
        declared: BTreeSet<String>,
        namespaces: NamespaceTable,
    ) -> Self {
        Self {
            engine: Rc::new(RefCell::new(engine)),
            node,
            declared: Rc::new(declared),
            namespaces,
        }
    }

    /// Whether `path` matches at least one node
    pub fn has_node(&self, path: &str) -> Result<bool> {
        match self.resolve(Some(path)) {
            Resolution::SyntaxError(reason) => Err(Error::invalid_path(path, reason)),
            resolution => Ok(resolution.is_found()),
        }
    }

    /// Number of nodes `path` matches
    pub fn count(&self, path: &str) -> Result<usize> {
        match self.resolve(Some(path)) {
            Resolution::SyntaxError(reason) => Err(Error::invalid_path(path, reason)),
            resolution => Ok(resolution.len()),
        }
    }

    /// Text of the single leaf node `path` matches, with surrounding
    /// whitespace removed. Without a path the reader's own node is read.
    ///
    /// An empty element reached through a path yields an empty string.
    pub fn get_string<'p>(&self, path: impl Into<Option<&'p str>>) -> Result<String> {
        let value = self.scalar(path.into())?;
        Ok(value.trim().to_string())
    }

    /// Like [`get_string`](Reader::get_string), but a path that matches
    /// nothing yields `None`
    pub fn get_optional_string(&self, path: &str) -> Result<Option<String>> {
        match self.scalar(Some(path)) {
            Ok(value) => Ok(Some(value.trim().to_string())),
            Err(Error::PathNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Integer value of the single leaf node `path` matches.
    ///
    /// Integer and decimal forms are accepted; decimals are truncated toward
    /// zero.
    pub fn get_int<'p>(&self, path: impl Into<Option<&'p str>>) -> Result<i64> {
        let path = path.into();
        let value = self.typed_scalar(path)?;
        parse_integer(&value).ok_or_else(|| Error::NotNumeric {
            path: path.unwrap_or(SELF_PATH).to_string(),
            value,
        })
    }

    /// Boolean value (`true`, `false`, `1`, `0`) of the single leaf node
    /// `path` matches
    pub fn get_bool<'p>(&self, path: impl Into<Option<&'p str>>) -> Result<bool> {
        let path = path.into();
        let value = self.typed_scalar(path)?;
        parse_boolean(&value).ok_or_else(|| Error::NotBoolean {
            path: path.unwrap_or(SELF_PATH).to_string(),
            value,
        })
    }

    /// One reader per node `path` matches, in document order.
    ///
    /// Every child reader starts with this reader's registered namespaces,
    /// registered again against the child's own scope.
    pub fn get_collection(&self, path: &str) -> Result<Vec<Self>> {
        let mut engine = self.engine.borrow_mut();
        let nodes = match resolver::resolve(&mut *engine, &self.node, Some(path), &self.namespaces) {
            Resolution::SyntaxError(reason) => return Err(Error::invalid_path(path, reason)),
            Resolution::Empty => return Err(Error::path_not_found(path)),
            resolution => resolution.into_nodes(),
        };
        debug!(path, count = nodes.len(), "collection expanded");
        nodes
            .into_iter()
            .map(|node| self.derive(&*engine, node))
            .collect()
    }

    /// Whether `uri` is declared in this node's scope
    pub fn has_namespace(&self, uri: &str) -> bool {
        let own = self.engine.borrow().declared_namespaces(&self.node);
        NamespaceScope::new(own, &self.declared).contains(uri)
    }

    /// Make `prefix` usable in paths on this reader and on readers derived
    /// from it afterwards
    pub fn register_namespace(&mut self, uri: &str, prefix: &str) -> Result<()> {
        let own = self.engine.borrow().declared_namespaces(&self.node);
        let scope = NamespaceScope::new(own, &self.declared);
        self.namespaces.register(&scope, uri, prefix)
    }

    /// Local name of the node, empty for nodes without a name
    pub fn name(&self) -> String {
        self.engine
            .borrow()
            .node_local_name(&self.node)
            .unwrap_or_default()
    }

    /// Namespace URI of the node, if it has one
    pub fn namespace_uri(&self) -> Option<String> {
        self.engine.borrow().node_namespace_uri(&self.node)
    }

    /// Attributes of the node as (name, value) pairs
    pub fn get_attributes(&self) -> Vec<(String, String)> {
        self.engine.borrow().attributes(&self.node)
    }

    /// The subtree rooted at this node as XML, with its original prefixes
    pub fn as_xml(&self) -> Result<String> {
        Ok(self.engine.borrow().serialize(&self.node)?)
    }

    /// Bindings registered on this reader
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Every namespace URI declared in the document
    pub fn document_namespaces(&self) -> &BTreeSet<String> {
        &self.declared
    }

    fn resolve(&self, path: Option<&str>) -> Resolution<E::Node> {
        let mut engine = self.engine.borrow_mut();
        resolver::resolve(&mut *engine, &self.node, path, &self.namespaces)
    }

    fn derive(&self, engine: &E, node: E::Node) -> Result<Self> {
        let scope = NamespaceScope::new(engine.declared_namespaces(&node), &self.declared);
        let namespaces = self.namespaces.rebind(&scope)?;
        Ok(Self {
            engine: Rc::clone(&self.engine),
            node,
            declared: Rc::clone(&self.declared),
            namespaces,
        })
    }

    /// Untrimmed text of the single leaf node `path` resolves to
    fn scalar(&self, path: Option<&str>) -> Result<String> {
        let shown = path.unwrap_or(SELF_PATH);
        let mut engine = self.engine.borrow_mut();
        let node = match resolver::resolve(&mut *engine, &self.node, path, &self.namespaces) {
            Resolution::SyntaxError(reason) => return Err(Error::invalid_path(shown, reason)),
            Resolution::Empty => return Err(Error::path_not_found(shown)),
            Resolution::Multiple(nodes) => {
                return Err(Error::AmbiguousPath {
                    path: shown.to_string(),
                    count: nodes.len(),
                })
            }
            Resolution::Singular(node) => node,
        };

        if !is_leaf(&*engine, &node, &self.declared) {
            let xml = engine.serialize(&node).unwrap_or_default();
            return Err(Error::NotALeafNode {
                path: shown.to_string(),
                excerpt: excerpt(&xml, EXCERPT_CHARS),
            });
        }

        match (engine.text(&node), path) {
            (Some(text), _) => Ok(text),
            (None, Some(_)) => Ok(String::new()),
            (None, None) => Err(Error::NotAScalarValue {
                name: engine.node_local_name(&node).unwrap_or_default(),
            }),
        }
    }

    /// Trimmed, non-empty text for typed getters
    fn typed_scalar(&self, path: Option<&str>) -> Result<String> {
        let value = self.get_string(path)?;
        if value.is_empty() {
            return Err(Error::EmptyValue {
                path: path.unwrap_or(SELF_PATH).to_string(),
            });
        }
        Ok(value)
    }
}

impl<E: XPathEngine> Clone for Reader<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Rc::clone(&self.engine),
            node: self.node.clone(),
            declared: Rc::clone(&self.declared),
            namespaces: self.namespaces.clone(),
        }
    }
}

impl<E: XPathEngine> fmt::Debug for Reader<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("node", &self.node)
            .field("namespaces", &self.namespaces)
            .finish_non_exhaustive()
    }
}
