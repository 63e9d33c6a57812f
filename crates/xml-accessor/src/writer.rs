//! Path-addressed mutation of a parsed document.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};
use xee_adapter::XeeEngine;
use xml_engine_traits::{MutableXmlTree, NodeType, XPathEngine};

use crate::document::load;
use crate::error::{Error, Result};
use crate::namespace::{is_ncname, NamespaceScope, NamespaceTable};
use crate::options::ReaderOptions;
use crate::reader::Reader;
use crate::resolver::{self, Resolution};

/// Mutator over a whole document.
///
/// Paths are evaluated with the document element as context. New elements
/// are created in the writer's default namespace. They serialize with the
/// prefix declared for it in the source, or declare it themselves where no
/// prefix for it is in scope.
///
/// ```
/// use xml_accessor::Writer;
///
/// let xml = r#"<shelf xmlns="urn:shelf"><book/></shelf>"#;
/// let mut writer = Writer::create(xml, Some("urn:shelf"), Some("s"))?;
///
/// assert_eq!(writer.add_node("/s:shelf/s:book", "title", &[("lang", "en")], Some("Dune"))?, 1);
/// let reader = writer.into_reader()?;
/// assert_eq!(reader.get_string("s:book/s:title[@lang='en']")?, "Dune");
/// # Ok::<(), xml_accessor::Error>(())
/// ```
pub struct Writer<E: XPathEngine + MutableXmlTree = XeeEngine> {
    engine: E,
    document: E::Document,
    element_namespace: Option<String>,
    declared: BTreeSet<String>,
    namespaces: NamespaceTable,
}

impl Writer<XeeEngine> {
    /// Parse `xml` for mutation.
    ///
    /// `namespace` and `prefix` follow the rules of
    /// [`Reader::create`](crate::Reader::create); `namespace` also becomes the
    /// namespace of every element this writer adds.
    pub fn create(xml: &str, namespace: Option<&str>, prefix: Option<&str>) -> Result<Self> {
        Self::with_options(xml, &ReaderOptions::from_parts(namespace, prefix))
    }

    /// Parse `xml` with the bindings in `options`
    pub fn with_options(xml: &str, options: &ReaderOptions) -> Result<Self> {
        Self::with_engine(XeeEngine::new(), xml, options)
    }
}

impl<E: XPathEngine + MutableXmlTree> Writer<E> {
    /// Parse `xml` into `engine` for mutation
    pub fn with_engine(mut engine: E, xml: &str, options: &ReaderOptions) -> Result<Self> {
        let loaded = load(&mut engine, xml, options)?;
        Ok(Self {
            engine,
            document: loaded.document,
            element_namespace: options.namespace.clone(),
            declared: loaded.declared,
            namespaces: loaded.namespaces,
        })
    }

    /// Make `prefix` usable in paths given to this writer
    pub fn register_namespace(&mut self, uri: &str, prefix: &str) -> Result<()> {
        let root = self.engine.document_element(&self.document)?;
        let scope = NamespaceScope::new(self.engine.declared_namespaces(&root), &self.declared);
        self.namespaces.register(&scope, uri, prefix)
    }

    /// Append a new element named `name` as the last child of every element
    /// `path` matches, with the given attributes and optional text.
    ///
    /// Returns the number of elements added. Either every target receives
    /// the new element or none does: a failure leaves the document as it was.
    pub fn add_node(
        &mut self,
        path: &str,
        name: &str,
        attributes: &[(&str, &str)],
        value: Option<&str>,
    ) -> Result<usize> {
        check_path(path)?;
        if !is_ncname(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        if let Some((attribute, _)) = attributes.iter().find(|(attribute, _)| !is_ncname(attribute)) {
            return Err(Error::InvalidName(attribute.to_string()));
        }

        let targets = self.targets(path)?;
        if targets.is_empty() {
            return Err(Error::path_not_found(path));
        }
        if targets
            .iter()
            .any(|target| self.engine.node_type(target) != NodeType::Element)
        {
            return Err(Error::NotAContainer {
                path: path.to_string(),
            });
        }

        let namespace = self.element_namespace.clone();
        self.apply(|engine| {
            for target in &targets {
                let element = engine.append_element(target, name, namespace.as_deref(), value)?;
                for (attribute, attribute_value) in attributes {
                    engine.set_attribute(&element, attribute, attribute_value)?;
                }
            }
            Ok(())
        })?;
        debug!(path, name, count = targets.len(), "node added");
        Ok(targets.len())
    }

    /// Remove every node `path` matches, subtree included.
    ///
    /// Returns the number of nodes removed; a path that matches nothing
    /// leaves the document untouched. The document element cannot be
    /// removed.
    pub fn remove_node(&mut self, path: &str) -> Result<usize> {
        check_path(path)?;
        let targets = self.targets(path)?;
        if targets.is_empty() {
            debug!(path, "nothing to remove");
            return Ok(0);
        }
        let root = self.engine.document_element(&self.document)?;
        if targets
            .iter()
            .any(|target| *target == root || self.engine.node_type(target) == NodeType::Document)
        {
            return Err(Error::NotRemovable {
                path: path.to_string(),
            });
        }

        self.apply(|engine| {
            for target in &targets {
                engine.detach(target)?;
            }
            Ok(())
        })?;
        debug!(path, count = targets.len(), "node removed");
        Ok(targets.len())
    }

    /// The current document as XML
    pub fn as_xml(&self) -> Result<String> {
        Ok(self.engine.serialize_document(&self.document)?)
    }

    /// Bindings registered on this writer
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Every namespace URI declared in the source document
    pub fn document_namespaces(&self) -> &BTreeSet<String> {
        &self.declared
    }

    /// Hand the mutated document over to a reader on its document element,
    /// keeping this writer's bindings
    pub fn into_reader(self) -> Result<Reader<E>> {
        let node = self.engine.document_element(&self.document)?;
        Ok(Reader::from_parts(
            self.engine,
            node,
            self.declared,
            self.namespaces,
        ))
    }

    fn targets(&mut self, path: &str) -> Result<Vec<E::Node>> {
        let root = self.engine.document_element(&self.document)?;
        match resolver::resolve(&mut self.engine, &root, Some(path), &self.namespaces) {
            Resolution::SyntaxError(reason) => Err(Error::invalid_path(path, reason)),
            resolution => Ok(resolution.into_nodes()),
        }
    }

    /// Run `change` against the engine and commit it. On failure the
    /// document is restored from a snapshot taken beforehand.
    fn apply<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut E) -> Result<()>,
    {
        let snapshot = self.as_xml()?;
        let committed = change(&mut self.engine)
            .and_then(|()| Ok(self.engine.commit(&self.document)?));
        match committed {
            Ok(document) => {
                self.document = document;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "mutation rolled back");
                self.document = self.engine.reload(&snapshot)?;
                Err(err)
            }
        }
    }
}

fn check_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(Error::invalid_path(path, "the path is empty"));
    }
    Ok(())
}

impl<E: XPathEngine + MutableXmlTree> fmt::Debug for Writer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("document", &self.document)
            .field("element_namespace", &self.element_namespace)
            .field("namespaces", &self.namespaces)
            .finish_non_exhaustive()
    }
}
