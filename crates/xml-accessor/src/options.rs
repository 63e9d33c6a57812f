//! Construction options shared by [`Reader`](crate::Reader) and
//! [`Writer`](crate::Writer).

use serde::{Deserialize, Serialize};

/// One prefix binding to register at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceBinding {
    pub fn new(uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// How a document is opened.
///
/// `namespace` and `prefix` form the default binding: the namespace used by
/// the writer for new elements and the prefix that selects it in paths.
/// `namespaces` lists further bindings registered on the root accessor.
///
/// ```
/// use xml_accessor::ReaderOptions;
///
/// let options: ReaderOptions = serde_json::from_str(
///     r#"{ "namespace": "http://www.example.org/book", "prefix": "t" }"#,
/// ).unwrap();
/// assert_eq!(options.prefix.as_deref(), Some("t"));
/// assert!(options.namespaces.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub namespaces: Vec<NamespaceBinding>,
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default binding
    pub fn default_namespace(mut self, uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.namespace = Some(uri.into());
        self.prefix = Some(prefix.into());
        self
    }

    /// Add a further binding
    pub fn namespace(mut self, uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.namespaces.push(NamespaceBinding::new(uri, prefix));
        self
    }

    pub(crate) fn from_parts(namespace: Option<&str>, prefix: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            prefix: prefix.map(str::to_string),
            namespaces: Vec::new(),
        }
    }
}
