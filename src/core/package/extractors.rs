//! Type-specific extraction for the three recognized executable types.
//!
//! Extractors never fail: a missing sub-element or attribute becomes `None` (or an empty
//! string for property values) so that malformed nodes still produce rows.

use crate::core::package::model::{ExecutableKind, PipelineComponent};
use crate::core::package::namespace::NamespaceContext;
use roxmltree::Node;
use std::collections::BTreeMap;

/// `DTS:ObjectData/ExecutePackageTask/PackageName`
pub fn extract_package_reference(node: Node<'_, '_>, ctx: &NamespaceContext) -> ExecutableKind {
    let package_name = object_data(node, ctx)
        .and_then(|data| child_element(data, "ExecutePackageTask"))
        .and_then(|task| child_element(task, "PackageName"))
        .and_then(|name| name.text())
        .map(str::to_string);

    ExecutableKind::PackageReference { package_name }
}

/// `DTS:ObjectData/SQLTask:SqlTaskData[@SQLTask:Connection, @SQLTask:SqlStatementSource]`
pub fn extract_sql_task(node: Node<'_, '_>, ctx: &NamespaceContext) -> ExecutableKind {
    let task_data = object_data(node, ctx).and_then(|data| {
        data.children()
            .find(|child| child.has_tag_name(ctx.sql_task("SqlTaskData")))
    });

    match task_data {
        Some(data) => ExecutableKind::SqlTask {
            connection_id: data
                .attribute(ctx.sql_task("Connection"))
                .map(str::to_string),
            statement: data
                .attribute(ctx.sql_task("SqlStatementSource"))
                .map(str::to_string),
        },
        None => ExecutableKind::SqlTask {
            connection_id: None,
            statement: None,
        },
    }
}

/// `DTS:ObjectData/pipeline/components/component`
pub fn extract_pipeline(node: Node<'_, '_>, ctx: &NamespaceContext) -> ExecutableKind {
    let components = object_data(node, ctx)
        .and_then(|data| child_element(data, "pipeline"))
        .and_then(|pipeline| child_element(pipeline, "components"))
        .map(|components| {
            components
                .children()
                .filter(|child| child.has_tag_name("component"))
                .map(extract_component)
                .collect()
        })
        .unwrap_or_default();

    ExecutableKind::Pipeline { components }
}

fn extract_component(component: Node<'_, '_>) -> PipelineComponent {
    let mut properties = BTreeMap::new();
    let property_nodes = component
        .children()
        .filter(|child| child.has_tag_name("properties"))
        .flat_map(|group| group.children())
        .filter(|child| child.has_tag_name("property"));

    for property in property_nodes {
        let Some(key) = property.attribute("name") else {
            tracing::debug!(
                component = component.attribute("name").unwrap_or_default(),
                "skipping component property without a name"
            );
            continue;
        };
        // Later duplicates overwrite earlier ones.
        properties.insert(key.to_string(), property.text().unwrap_or_default().to_string());
    }

    PipelineComponent {
        name: component.attribute("name").map(str::to_string),
        type_id: component.attribute("componentClassID").map(str::to_string),
        properties,
    }
}

fn object_data<'a, 'input>(
    node: Node<'a, 'input>,
    ctx: &NamespaceContext,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.has_tag_name(ctx.dts("ObjectData")))
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(local))
}
