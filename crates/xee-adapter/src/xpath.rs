//! XPathEngine implementation for xee

use xee_xpath::{context::StaticContextBuilder, Documents, Item, Queries, Query};
use xml_engine_traits::{
    error::{Error, Result},
    xpath::XPathEngine,
};
use xot::Node;

/// xee XPath engine adapter.
///
/// Owns the xot arena (through [`Documents`]) that every node handle handed
/// out by this engine points into. One engine is meant to hold one document:
/// [`commit`](xml_engine_traits::MutableXmlTree::commit) rebuilds the arena
/// from the current state of that document.
pub struct XeeEngine {
    pub(crate) documents: Documents,
}

impl XeeEngine {
    /// Create a new xee engine
    pub fn new() -> Self {
        Self {
            documents: Documents::new(),
        }
    }
}

impl std::fmt::Debug for XeeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XeeEngine").finish_non_exhaustive()
    }
}

impl Default for XeeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl XPathEngine for XeeEngine {
    fn select(
        &mut self,
        context_node: &Node,
        xpath: &str,
        namespaces: &[(&str, &str)],
    ) -> Result<Vec<Node>> {
        let mut static_context_builder = StaticContextBuilder::default();
        static_context_builder.namespaces(namespaces.iter().copied());
        let queries = Queries::new(static_context_builder);

        let query = queries
            .sequence(xpath)
            .map_err(|e| Error::xpath_compile(format!("{:?}", e)))?;

        let sequence = query
            .execute(&mut self.documents, &Item::Node(*context_node))
            .map_err(|e| Error::xpath_eval(format!("{:?}", e)))?;

        let mut nodes = Vec::new();
        for item in sequence.iter() {
            match item {
                Item::Node(node) => nodes.push(node.clone()),
                _ => {
                    return Err(Error::xpath_eval(format!(
                        "\"{}\" selects values other than nodes",
                        xpath
                    )))
                }
            }
        }
        Ok(nodes)
    }
}
