//! Typed, path-addressed access to XML documents.
//!
//! A [`Reader`] answers questions about one node of a document through
//! XPath expressions: does a path exist, what is the scalar value it points
//! to, which nodes does it expand to. A [`Writer`] adds and removes elements
//! by path. Both refuse namespace prefixes that were not registered for a
//! namespace actually declared in the document.
//!
//! ```
//! use xml_accessor::{ErrorKind, Reader};
//!
//! let xml = r#"<shelf xmlns="urn:shelf">
//!     <book><title>Dune</title><author>Herbert</author></book>
//!     <book><title>Emma</title><author>Austen</author></book>
//! </shelf>"#;
//! let reader = Reader::create(xml, Some("urn:shelf"), Some("s"))?;
//!
//! let titles = reader
//!     .get_collection("s:book")?
//!     .iter()
//!     .map(|book| book.get_string("s:title"))
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(titles, ["Dune", "Emma"]);
//!
//! let err = reader.get_string("s:book/s:title").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::AmbiguousPath);
//! # Ok::<(), xml_accessor::Error>(())
//! ```

pub mod classifier;
mod document;
pub mod error;
pub mod namespace;
pub mod options;
pub mod reader;
pub mod resolver;
mod scalar;
pub mod writer;

pub use classifier::is_leaf;
pub use error::{Error, ErrorKind, Result};
pub use namespace::{declared_namespaces, NamespaceScope, NamespaceTable};
pub use options::{NamespaceBinding, ReaderOptions};
pub use reader::Reader;
pub use resolver::{resolve, Resolution};
pub use writer::Writer;
pub use xee_adapter::XeeEngine;
