//! Error types for XML engine operations


/// Result type for XML engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all XML engine operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML parsing failed; one entry per diagnostic reported by the parser
    #[error("XML parsing error: {}", .0.join("; "))]
    XmlParse(Vec<String>),

    /// XPath compilation failed
    #[error("XPath compilation error: {0}")]
    XPathCompile(String),

    /// XPath evaluation failed
    #[error("XPath evaluation error: {0}")]
    XPathEval(String),

    /// Node access error
    #[error("Node access error: {0}")]
    NodeAccess(String),

    /// Serialization of a node or document failed
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A tree mutation was rejected by the engine
    #[error("Mutation error: {0}")]
    Mutation(String),
}

impl Error {
    /// Create a new XML parse error from a chain of diagnostics
    pub fn xml_parse(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut diagnostics = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            diagnostics.push(cause.to_string());
            source = cause.source();
        }
        Error::XmlParse(diagnostics)
    }

    /// Create a new XPath compilation error
    pub fn xpath_compile<S: Into<String>>(msg: S) -> Self {
        Error::XPathCompile(msg.into())
    }

    /// Create a new XPath evaluation error
    pub fn xpath_eval<S: Into<String>>(msg: S) -> Self {
        Error::XPathEval(msg.into())
    }

    /// Create a new node access error
    pub fn node_access<S: Into<String>>(msg: S) -> Self {
        Error::NodeAccess(msg.into())
    }
}
