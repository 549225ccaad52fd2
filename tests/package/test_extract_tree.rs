use dtsx_flatten::core::package::{
    extract_document, ExecutableKind, ExecutableNode, ExtractError, PackageDocument,
};
use std::collections::BTreeMap;
use std::path::Path;

const SALES_LOAD: &str = include_str!("../fixtures/sales_load.dtsx");

fn ids(nodes: &[ExecutableNode]) -> Vec<Option<&str>> {
    nodes.iter().map(|node| node.id.as_deref()).collect()
}

#[test]
fn root_level_executables_follow_document_order() {
    let nodes = extract_document(SALES_LOAD).expect("extract sales load");
    assert_eq!(
        ids(&nodes),
        vec![
            Some("Package\\Prepare"),
            Some("Package\\Load sales"),
            Some("Package\\Run child"),
            Some("Package\\Notify"),
        ]
    );
    // Connection managers are not executables.
    assert!(nodes.iter().all(|node| node.tag == "Executable"));
}

#[test]
fn nested_executables_become_children() {
    let nodes = extract_document(SALES_LOAD).expect("extract sales load");
    let prepare = &nodes[0];
    assert_eq!(prepare.kind, ExecutableKind::Generic);
    assert_eq!(ids(&prepare.children), vec![Some("Package\\Prepare\\Truncate staging")]);
    assert_eq!(
        prepare.children[0].kind,
        ExecutableKind::SqlTask {
            connection_id: Some("{7A1B2C3D-0000-4000-8000-000000000001}".to_string()),
            statement: Some("TRUNCATE TABLE stg.Sales".to_string()),
        }
    );
    assert_eq!(prepare.subtree_len(), 2);
}

#[test]
fn pipeline_components_carry_every_property() {
    let nodes = extract_document(SALES_LOAD).expect("extract sales load");
    let pipeline = &nodes[1];
    let components = pipeline.components();
    assert_eq!(components.len(), 2);

    assert_eq!(components[0].name.as_deref(), Some("Source"));
    assert_eq!(components[0].type_id.as_deref(), Some("Microsoft.OLEDBSource"));
    assert_eq!(
        components[0].properties,
        BTreeMap::from([
            ("AccessMode".to_string(), "0".to_string()),
            ("OpenRowset".to_string(), "[dbo].[Sales]".to_string()),
        ])
    );
    assert_eq!(components[1].properties["FastLoadOptions"], "");
}

#[test]
fn package_reference_and_unknown_types() {
    let nodes = extract_document(SALES_LOAD).expect("extract sales load");
    assert_eq!(
        nodes[2].kind,
        ExecutableKind::PackageReference {
            package_name: Some("Child.dtsx".to_string())
        }
    );
    assert_eq!(nodes[3].executable_type, "Custom.Task");
    assert_eq!(nodes[3].kind, ExecutableKind::Generic);
    assert!(nodes[3].children.is_empty());
}

#[test]
fn missing_namespace_is_a_structural_failure() {
    let xml = include_str!("../fixtures/no_namespace.dtsx");
    let err = extract_document(xml).unwrap_err();
    assert!(matches!(err, ExtractError::MissingNamespace { .. }));
    assert!(err.to_string().contains("www.microsoft.com/SqlServer/Dts"));
}

#[test]
fn malformed_xml_is_reported_not_partially_extracted() {
    let xml = include_str!("../fixtures/truncated.dtsx");
    assert!(matches!(extract_document(xml), Err(ExtractError::Xml(_))));
}

#[test]
fn load_tags_failures_with_document_path() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/no_namespace.dtsx");
    let err = PackageDocument::load(&path).unwrap_err();
    assert_eq!(err.document(), path.as_path());
    assert!(err.to_string().contains("no_namespace.dtsx"));
}

#[test]
fn extraction_is_repeatable() {
    let first = extract_document(SALES_LOAD).unwrap();
    let second = extract_document(SALES_LOAD).unwrap();
    assert_eq!(first, second);
}
