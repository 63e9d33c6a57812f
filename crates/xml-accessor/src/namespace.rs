//! Declared and registered namespaces.
//!
//! Two sets are tracked separately. The *declared* set holds every namespace
//! URI written anywhere in the source text and is computed once per document.
//! The *registered* [`NamespaceTable`] holds the prefix bindings one accessor
//! may use in path expressions; a binding is only accepted for a URI that is
//! declared in the node's scope.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

/// Markup that can hold text looking like a declaration, followed by start
/// tags. Only group 1 (the attribute list of a start tag) is inspected.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>|<\?.*?\?>|<![A-Za-z][^\[>]*(?:\[.*?\])?\s*>|<[^\s!?/>]+((?:\s+[^\s=/>]+\s*=\s*(?:"[^"]*"|'[^']*'))*)\s*/?>"#,
    )
    .expect("markup pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern is valid")
});

/// Scan raw document text for `xmlns` / `xmlns:prefix` declarations and
/// return every declared URI.
///
/// The scan is not tree aware: declarations on any element count, whatever
/// their depth. Only start tags are read, so text, comments, CDATA sections
/// and processing instructions never contribute. Undeclarations
/// (`xmlns=""`) are skipped.
pub fn declared_namespaces(text: &str) -> BTreeSet<String> {
    MARKUP
        .captures_iter(text)
        .filter_map(|tag| tag.get(1))
        .flat_map(|attributes| ATTRIBUTE.captures_iter(attributes.as_str()))
        .filter(|attribute| {
            let name = &attribute[1];
            name == "xmlns" || name.starts_with("xmlns:")
        })
        .filter_map(|attribute| attribute.get(2).or_else(|| attribute.get(3)))
        .map(|uri| unescape(uri.as_str()))
        .filter(|uri| !uri.is_empty())
        .collect()
}

fn unescape(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Whether `name` is a valid XML NCName (a name without a colon).
pub fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '\u{B7}'))
}

/// The namespaces visible from one node: the ones it declares itself,
/// backed by the document-wide declared set.
#[derive(Debug, Clone)]
pub struct NamespaceScope<'a> {
    own: Vec<String>,
    document: &'a BTreeSet<String>,
}

impl<'a> NamespaceScope<'a> {
    pub fn new(own: Vec<String>, document: &'a BTreeSet<String>) -> Self {
        Self { own, document }
    }

    /// Whether `uri` is declared in this scope
    pub fn contains(&self, uri: &str) -> bool {
        self.own.iter().any(|declared| declared == uri) || self.document.contains(uri)
    }

    /// The node's own declarations
    pub fn own(&self) -> &[String] {
        &self.own
    }
}

/// Prefix to namespace URI bindings usable in path expressions.
///
/// Each accessor owns its table. Tables are copied, never shared, when a
/// child accessor is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    bindings: BTreeMap<String, String>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri` after checking that `uri` is declared in
    /// `scope`. A prefix registered twice keeps the latest URI.
    pub fn register(&mut self, scope: &NamespaceScope<'_>, uri: &str, prefix: &str) -> Result<()> {
        if uri.is_empty() {
            return Err(Error::invalid_namespace("the empty namespace cannot be registered"));
        }
        if !is_ncname(prefix) || prefix.eq_ignore_ascii_case("xmlns") {
            return Err(Error::invalid_namespace(format!(
                "\"{prefix}\" is not a usable namespace prefix"
            )));
        }
        if !scope.contains(uri) {
            return Err(Error::invalid_namespace(format!(
                "{uri} is not declared in the document"
            )));
        }
        debug!(prefix, uri, "namespace registered");
        self.bindings.insert(prefix.to_string(), uri.to_string());
        Ok(())
    }

    /// Re-register every binding of this table against another scope.
    pub fn rebind(&self, scope: &NamespaceScope<'_>) -> Result<Self> {
        let mut table = Self::new();
        for (prefix, uri) in self.iter() {
            table.register(scope, uri, prefix)?;
        }
        Ok(table)
    }

    /// URI bound to `prefix`
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.bindings.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The bindings in the shape the engine expects
    pub(crate) fn as_pairs(&self) -> Vec<(&str, &str)> {
        self.iter().collect()
    }
}

/// Iterator over (prefix, uri) bindings, ordered by prefix
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }
}

impl<'a> IntoIterator for &'a NamespaceTable {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn set(uris: &[&str]) -> BTreeSet<String> {
        uris.iter().map(|uri| uri.to_string()).collect()
    }

    #[test]
    fn declarations_anywhere_in_the_text_are_found() {
        let text = r#"<a xmlns="urn:one"><b xmlns:x='urn:two'><c xmlns:y = "urn:three" xmlns=""/></b></a>"#;
        assert_eq!(
            declared_namespaces(text),
            set(&["urn:one", "urn:three", "urn:two"])
        );
    }

    #[test]
    fn attribute_values_that_look_like_declarations_are_ignored() {
        let text = r#"<a notxmlns="urn:no" title="xmlns"/>"#;
        assert!(declared_namespaces(text).is_empty());
    }

    #[test]
    fn declarations_outside_start_tags_are_ignored() {
        let text = r#"<?xml version="1.0"?>
<!-- <old xmlns="urn:comment"> -->
<a xmlns="urn:real">
  <note> xmlns="urn:text" </note>
  <![CDATA[<b xmlns:c="urn:cdata"/>]]>
  <?pi xmlns="urn:pi"?>
  <d title='x xmlns="urn:quoted"' flag="a>b" xmlns:e="urn:after"/>
</a>"#;
        assert_eq!(declared_namespaces(text), set(&["urn:after", "urn:real"]));
    }

    #[test]
    fn entities_in_uris_are_resolved() {
        let text = r#"<a xmlns:q="http://example.org/?a=1&amp;b=2"/>"#;
        assert_eq!(
            declared_namespaces(text),
            set(&["http://example.org/?a=1&b=2"])
        );
    }

    #[rstest]
    #[case("t", true)]
    #[case("book_2", true)]
    #[case("_x.y-z", true)]
    #[case("", false)]
    #[case("2t", false)]
    #[case("a:b", false)]
    #[case("a b", false)]
    fn ncname(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_ncname(name), expected);
    }

    #[test]
    fn register_requires_a_declared_uri() {
        let document = set(&["urn:book"]);
        let scope = NamespaceScope::new(Vec::new(), &document);
        let mut table = NamespaceTable::new();

        table.register(&scope, "urn:book", "t").unwrap();
        assert_eq!(table.get("t"), Some("urn:book"));

        let err = table.register(&scope, "urn:other", "o").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidNamespace);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn register_rejects_bad_prefixes() {
        let document = set(&["urn:book"]);
        let scope = NamespaceScope::new(Vec::new(), &document);
        let mut table = NamespaceTable::new();

        assert!(table.register(&scope, "urn:book", "").is_err());
        assert!(table.register(&scope, "urn:book", "a:b").is_err());
        assert!(table.register(&scope, "urn:book", "xmlns").is_err());
        assert!(table.register(&scope, "", "t").is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn own_declarations_extend_the_scope() {
        let document = set(&["urn:book"]);
        let scope = NamespaceScope::new(vec!["urn:local".to_string()], &document);
        assert!(scope.contains("urn:local"));
        assert!(scope.contains("urn:book"));
        assert!(!scope.contains("urn:missing"));
    }

    #[test]
    fn rebind_copies_every_binding() {
        let document = set(&["urn:book", "urn:id"]);
        let scope = NamespaceScope::new(Vec::new(), &document);
        let mut table = NamespaceTable::new();
        table.register(&scope, "urn:book", "t").unwrap();
        table.register(&scope, "urn:id", "n").unwrap();

        let child_scope = NamespaceScope::new(vec!["urn:id".to_string()], &document);
        let rebound = table.rebind(&child_scope).unwrap();
        assert_eq!(rebound, table);
        assert_eq!(
            rebound.iter().collect::<Vec<_>>(),
            vec![("n", "urn:id"), ("t", "urn:book")]
        );
    }
}
