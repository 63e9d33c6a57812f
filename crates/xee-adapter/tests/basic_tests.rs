//! Basic tests for xee-adapter

use rstest::rstest;
use xee_adapter::XeeEngine;
use xml_engine_traits::{Error, MutableXmlTree, NodeType, XPathEngine, XmlTree};

const CATALOG: &str = r#"<catalog xmlns="urn:catalog" xmlns:p="urn:price">
  <item id="a1" kind="tool">Hammer<p:cost>12</p:cost></item>
  <item id="a2">Saw</item>
  <note xmlns="">loose</note>
</catalog>"#;

fn load(xml: &str) -> (XeeEngine, xee_adapter::Node) {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml(xml).unwrap();
    let root = engine.document_element(&doc).unwrap();
    (engine, root)
}

#[test]
fn test_parse_xml_and_names() {
    let (engine, root) = load("<root><item>test</item></root>");

    assert_eq!(engine.node_local_name(&root), Some("root".to_string()));
    assert_eq!(engine.node_type(&root), NodeType::Element);
    assert_eq!(engine.node_namespace_uri(&root), None);

    let children = engine.children(&root, None).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(engine.node_local_name(&children[0]), Some("item".to_string()));
}

#[test]
fn test_parse_xml_reports_diagnostics() {
    let mut engine = XeeEngine::new();
    match engine.parse_xml("<root><unclosed></root>") {
        Err(Error::XmlParse(diagnostics)) => assert!(!diagnostics.is_empty()),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_children_are_filtered_by_namespace() {
    let (engine, root) = load(CATALOG);

    let items = engine.children(&root, Some("urn:catalog")).unwrap();
    assert_eq!(items.len(), 2);

    let unqualified = engine.children(&root, None).unwrap();
    assert_eq!(unqualified.len(), 1);
    assert_eq!(engine.node_local_name(&unqualified[0]), Some("note".to_string()));

    let priced = engine.children(&items[0], Some("urn:price")).unwrap();
    assert_eq!(priced.len(), 1);
    assert!(engine.children(&items[1], Some("urn:price")).unwrap().is_empty());
}

#[test]
fn test_attributes_have_no_children() {
    let (mut engine, root) = load(CATALOG);
    let ids = engine
        .select(&root, "c:item/@id", &[("c", "urn:catalog")])
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(engine.node_type(&ids[0]), NodeType::Attribute);
    assert_eq!(engine.children(&ids[0], None), None);
    assert_eq!(engine.text(&ids[0]), Some("a1".to_string()));
}

#[test]
fn test_text_and_attributes() {
    let (engine, root) = load(CATALOG);
    let items = engine.children(&root, Some("urn:catalog")).unwrap();

    assert_eq!(engine.text(&items[0]), Some("Hammer".to_string()));
    assert_eq!(engine.text(&items[1]), Some("Saw".to_string()));
    assert_eq!(
        engine.attributes(&items[0]),
        vec![
            ("id".to_string(), "a1".to_string()),
            ("kind".to_string(), "tool".to_string()),
        ]
    );

    let (engine, root) = load("<root><empty/></root>");
    let empty = engine.children(&root, None).unwrap();
    assert_eq!(engine.text(&empty[0]), None);
}

#[test]
fn test_declared_namespaces_are_local_to_the_node() {
    let (engine, root) = load(CATALOG);
    let mut declared = engine.declared_namespaces(&root);
    declared.sort();
    assert_eq!(declared, vec!["urn:catalog".to_string(), "urn:price".to_string()]);

    let items = engine.children(&root, Some("urn:catalog")).unwrap();
    assert!(engine.declared_namespaces(&items[0]).is_empty());
}

#[rstest]
#[case("/c:catalog", 1)]
#[case("/c:catalog/c:item", 2)]
#[case("/c:catalog/c:item[@kind='tool']", 1)]
#[case("/c:catalog/note", 1)]
#[case("/c:catalog/item", 0)]
#[case("//p:cost", 1)]
fn test_select_with_bindings(#[case] xpath: &str, #[case] expected: usize) {
    let (mut engine, root) = load(CATALOG);
    let nodes = engine
        .select(&root, xpath, &[("c", "urn:catalog"), ("p", "urn:price")])
        .unwrap();
    assert_eq!(nodes.len(), expected, "{xpath}");
}

#[test]
fn test_select_relative_to_context_node() {
    let (mut engine, root) = load(CATALOG);
    let items = engine.children(&root, Some("urn:catalog")).unwrap();
    let cost = engine.select(&items[0], "p:cost", &[("p", "urn:price")]).unwrap();
    assert_eq!(cost.len(), 1);
    assert_eq!(engine.text(&cost[0]), Some("12".to_string()));
}

#[test]
fn test_select_reports_syntax_errors() {
    let (mut engine, root) = load(CATALOG);
    let err = engine
        .select(&root, "/c:catalog@id", &[("c", "urn:catalog")])
        .unwrap_err();
    assert!(
        matches!(err, Error::XPathCompile(_) | Error::XPathEval(_)),
        "{err:?}"
    );
}

#[test]
fn test_select_rejects_unbound_prefixes() {
    let (mut engine, root) = load(CATALOG);
    let err = engine.select(&root, "/c:catalog", &[]).unwrap_err();
    assert!(
        matches!(err, Error::XPathCompile(_) | Error::XPathEval(_)),
        "{err:?}"
    );
}

#[test]
fn test_select_rejects_atomic_results() {
    let (mut engine, root) = load(CATALOG);
    let err = engine.select(&root, "count(//*)", &[]).unwrap_err();
    assert!(matches!(err, Error::XPathEval(_)), "{err:?}");
}

#[test]
fn test_append_and_commit() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml(CATALOG).unwrap();
    let root = engine.document_element(&doc).unwrap();

    let added = engine
        .append_element(&root, "item", Some("urn:catalog"), Some("Drill"))
        .unwrap();
    engine.set_attribute(&added, "id", "a3").unwrap();

    let doc = engine.commit(&doc).unwrap();
    let root = engine.document_element(&doc).unwrap();
    let found = engine
        .select(&root, "/c:catalog/c:item[@id='a3']", &[("c", "urn:catalog")])
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(engine.text(&found[0]), Some("Drill".to_string()));
}

#[test]
fn test_detach_element_and_attribute() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml(CATALOG).unwrap();
    let root = engine.document_element(&doc).unwrap();
    let bindings = [("c", "urn:catalog")];

    let kind = engine.select(&root, "c:item/@kind", &bindings).unwrap();
    engine.detach(&kind[0]).unwrap();
    let note = engine.select(&root, "note", &bindings).unwrap();
    engine.detach(&note[0]).unwrap();

    let doc = engine.commit(&doc).unwrap();
    let xml = engine.serialize_document(&doc).unwrap();
    assert!(!xml.contains("kind="));
    assert!(!xml.contains("loose"));
    assert!(xml.contains("Hammer"));
}

#[test]
fn test_serialize_keeps_prefixes() {
    let (engine, root) = load(CATALOG);
    let xml = engine.serialize(&root).unwrap();
    assert!(xml.contains("p:cost"));
    assert!(xml.contains("xmlns:p=\"urn:price\""));
}

#[test]
fn test_append_declares_a_namespace_out_of_scope() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml(CATALOG).unwrap();
    let root = engine.document_element(&doc).unwrap();
    let note = engine.select(&root, "note", &[]).unwrap();

    engine
        .append_element(&note[0], "item", Some("urn:catalog"), Some("Chisel"))
        .unwrap();
    engine
        .append_element(&root, "item", Some("urn:catalog"), Some("Plane"))
        .unwrap();

    let doc = engine.commit(&doc).unwrap();
    let xml = engine.serialize_document(&doc).unwrap();
    assert!(xml.contains(r#"<item xmlns="urn:catalog">Chisel</item>"#), "{xml}");
    assert!(xml.contains("<item>Plane</item>"), "{xml}");

    let root = engine.document_element(&doc).unwrap();
    let nested = engine
        .select(&root, "note/c:item", &[("c", "urn:catalog")])
        .unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(engine.text(&nested[0]), Some("Chisel".to_string()));
}

#[test]
fn test_reload_replaces_the_document() {
    let mut engine = XeeEngine::new();
    engine.parse_xml(CATALOG).unwrap();

    let doc = engine.reload("<fresh><leaf/></fresh>").unwrap();
    let root = engine.document_element(&doc).unwrap();
    assert_eq!(engine.node_local_name(&root), Some("fresh".to_string()));

    assert!(matches!(
        engine.reload("<broken>"),
        Err(Error::XmlParse(_))
    ));
}
