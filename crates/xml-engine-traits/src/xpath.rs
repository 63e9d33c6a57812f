//! XPath engine abstraction trait

use crate::error::Result;
use crate::tree::XmlTree;

/// Trait for XPath query engines.
///
/// This trait abstracts over different XPath implementation strategies,
/// allowing different engines to be used interchangeably.
///
/// Note: This trait does not require Send + Sync as most XML
/// libraries use Rc<T> for internal references. Users needing
/// thread-safety should wrap the engine in Arc<Mutex<T>>.
pub trait XPathEngine: XmlTree {
    /// Evaluate `xpath` with `context_node` as the context item and return
    /// the selected nodes in document order.
    ///
    /// `namespaces` holds the (prefix, uri) bindings visible to the
    /// expression; no other prefixes may be resolved. A compilation failure
    /// is reported as [`Error::XPathCompile`](crate::Error::XPathCompile), a
    /// runtime failure, including an expression that yields non-node items,
    /// as [`Error::XPathEval`](crate::Error::XPathEval).
    fn select(
        &mut self,
        context_node: &Self::Node,
        xpath: &str,
        namespaces: &[(&str, &str)],
    ) -> Result<Vec<Self::Node>>;
}
