//! Error types for accessor and mutator operations

use serde::Serialize;

/// Result type for accessor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure an accessor or mutator call can surface.
///
/// Structural outcomes (`PathNotFound`, `AmbiguousPath`, `NotALeafNode`,
/// `NotAScalarValue`) are kept apart from value coercion failures
/// (`EmptyValue`, `NotNumeric`, `NotBoolean`).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document failed to parse
    #[error("invalid XML: {}", .diagnostics.join("; "))]
    InvalidXml { diagnostics: Vec<String> },

    /// The namespace is not declared in scope, or a binding is incomplete
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    /// The path expression failed to compile or evaluate
    #[error("invalid path \"{path}\": {reason}")]
    InvalidPath { path: String, reason: String },

    /// The path matched no node where at least one was required
    #[error("path \"{path}\" not found")]
    PathNotFound { path: String },

    /// The path matched several nodes where exactly one was required
    #[error("path \"{path}\" is ambiguous: {count} nodes match")]
    AmbiguousPath { path: String, count: usize },

    /// The matched node has element children where a scalar was required
    #[error("path \"{path}\" is not a leaf node: {excerpt}")]
    NotALeafNode { path: String, excerpt: String },

    /// Self-access on a node that carries no text
    #[error("node \"{name}\" has no scalar value")]
    NotAScalarValue { name: String },

    /// The scalar exists but is empty where a typed value was required
    #[error("path \"{path}\" is empty")]
    EmptyValue { path: String },

    /// The scalar is not an integer or decimal number
    #[error("path \"{path}\" is not a numeric value: {value:?}")]
    NotNumeric { path: String, value: String },

    /// The scalar is not a boolean literal
    #[error("path \"{path}\" is not a boolean value: {value:?}")]
    NotBoolean { path: String, value: String },

    /// A mutation target cannot hold child elements
    #[error("path \"{path}\" selects a node that cannot hold children")]
    NotAContainer { path: String },

    /// A removal target is the document element or the document itself
    #[error("path \"{path}\" selects the document element, which cannot be removed")]
    NotRemovable { path: String },

    /// An element or prefix name is not a valid XML name
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// The underlying engine failed to serialize or mutate the tree
    #[error(transparent)]
    Engine(#[from] xml_engine_traits::Error),
}

/// Stable discriminant of an [`Error`], with numeric codes for callers that
/// report failures across process boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidPath = 1,
    PathNotFound = 2,
    AmbiguousPath = 3,
    NotALeafNode = 4,
    InvalidNamespace = 5,
    InvalidXml = 6,
    NotAScalarValue = 7,
    EmptyValue = 8,
    NotNumeric = 9,
    NotBoolean = 10,
    NotAContainer = 11,
    InvalidName = 12,
    Engine = 13,
    NotRemovable = 14,
}

impl ErrorKind {
    /// Numeric code of this kind
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl Error {
    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidXml { .. } => ErrorKind::InvalidXml,
            Error::InvalidNamespace(_) => ErrorKind::InvalidNamespace,
            Error::InvalidPath { .. } => ErrorKind::InvalidPath,
            Error::PathNotFound { .. } => ErrorKind::PathNotFound,
            Error::AmbiguousPath { .. } => ErrorKind::AmbiguousPath,
            Error::NotALeafNode { .. } => ErrorKind::NotALeafNode,
            Error::NotAScalarValue { .. } => ErrorKind::NotAScalarValue,
            Error::EmptyValue { .. } => ErrorKind::EmptyValue,
            Error::NotNumeric { .. } => ErrorKind::NotNumeric,
            Error::NotBoolean { .. } => ErrorKind::NotBoolean,
            Error::NotAContainer { .. } => ErrorKind::NotAContainer,
            Error::InvalidName(_) => ErrorKind::InvalidName,
            Error::Engine(_) => ErrorKind::Engine,
            Error::NotRemovable { .. } => ErrorKind::NotRemovable,
        }
    }

    /// Numeric code of this error, see [`ErrorKind::code`]
    pub fn code(&self) -> u16 {
        self.kind().code()
    }

    pub(crate) fn invalid_namespace<S: Into<String>>(msg: S) -> Self {
        Error::InvalidNamespace(msg.into())
    }

    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn path_not_found(path: &str) -> Self {
        Error::PathNotFound {
            path: path.to_string(),
        }
    }

    /// Map an engine error raised while loading a document
    pub(crate) fn from_load(err: xml_engine_traits::Error) -> Self {
        match err {
            xml_engine_traits::Error::XmlParse(diagnostics) => Error::InvalidXml { diagnostics },
            other => Error::Engine(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Error::invalid_path("/a", "syntax").code(), 1);
        assert_eq!(Error::path_not_found("/a").code(), 2);
        assert_eq!(
            Error::AmbiguousPath {
                path: "/a".into(),
                count: 2
            }
            .code(),
            3
        );
        assert_eq!(Error::invalid_namespace("urn:x").code(), 5);
        assert_eq!(ErrorKind::Engine.code(), 13);
        assert_eq!(
            Error::NotRemovable { path: "/a".into() }.code(),
            14
        );
    }

    #[test]
    fn load_errors_become_invalid_xml() {
        let err = Error::from_load(xml_engine_traits::Error::XmlParse(vec![
            "unclosed tag".into(),
            "at line 1".into(),
        ]));
        assert_eq!(err.kind(), ErrorKind::InvalidXml);
        assert_eq!(err.to_string(), "invalid XML: unclosed tag; at line 1");

        let err = Error::from_load(xml_engine_traits::Error::node_access("no root"));
        assert_eq!(err.kind(), ErrorKind::Engine);
    }
}
