//! Document loading shared by readers and writers.

use std::collections::BTreeSet;

use tracing::debug;
use xml_engine_traits::XmlTree;

use crate::error::{Error, Result};
use crate::namespace::{declared_namespaces, NamespaceScope, NamespaceTable};
use crate::options::ReaderOptions;

/// A parsed document together with its namespace state.
pub(crate) struct LoadedDocument<D> {
    pub document: D,
    pub declared: BTreeSet<String>,
    pub namespaces: NamespaceTable,
}

/// Parse `text`, collect its declared namespaces and register the bindings
/// requested in `options` on a fresh table.
pub(crate) fn load<E: XmlTree>(
    engine: &mut E,
    text: &str,
    options: &ReaderOptions,
) -> Result<LoadedDocument<E::Document>> {
    let document = engine.parse_xml(text).map_err(Error::from_load)?;
    let declared = declared_namespaces(text);
    debug!(declared = declared.len(), "document parsed");

    let mut namespaces = NamespaceTable::new();
    let scope = NamespaceScope::new(Vec::new(), &declared);
    match (&options.namespace, &options.prefix) {
        (Some(uri), Some(prefix)) => namespaces.register(&scope, uri, prefix)?,
        (Some(uri), None) => {
            if !declared.contains(uri) {
                return Err(Error::invalid_namespace(format!(
                    "{uri} is not declared in the document"
                )));
            }
            return Err(Error::invalid_namespace(format!(
                "a prefix is required to use {uri} in paths"
            )));
        }
        (None, Some(prefix)) => {
            return Err(Error::invalid_namespace(format!(
                "prefix \"{prefix}\" is given without a namespace"
            )));
        }
        (None, None) => {}
    }
    for binding in &options.namespaces {
        namespaces.register(&scope, &binding.uri, &binding.prefix)?;
    }

    Ok(LoadedDocument {
        document,
        declared,
        namespaces,
    })
}
