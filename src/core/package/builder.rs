use crate::core::package::extractors::{
    extract_package_reference, extract_pipeline, extract_sql_task,
};
use crate::core::package::model::{
    ExecutableKind, ExecutableNode, PACKAGE_REFERENCE_TYPE, PIPELINE_TYPE, SQL_TASK_TYPE,
};
use crate::core::package::namespace::NamespaceContext;
use roxmltree::Node;

/// Build the executables nested directly under `container`, each with its full subtree.
///
/// Executables are found at `DTS:Executables/DTS:Executable` and returned in document order.
pub fn build_executables(container: Node<'_, '_>, ctx: &NamespaceContext) -> Vec<ExecutableNode> {
    container
        .children()
        .filter(|child| child.has_tag_name(ctx.dts("Executables")))
        .flat_map(|group| group.children())
        .filter(|child| child.has_tag_name(ctx.dts("Executable")))
        .map(|element| build_node(element, ctx))
        .collect()
}

fn build_node(element: Node<'_, '_>, ctx: &NamespaceContext) -> ExecutableNode {
    let executable_type = element
        .attribute(ctx.dts("ExecutableType"))
        .unwrap_or_default()
        .to_string();

    let kind = match executable_type.as_str() {
        PACKAGE_REFERENCE_TYPE => extract_package_reference(element, ctx),
        PIPELINE_TYPE => extract_pipeline(element, ctx),
        SQL_TASK_TYPE => extract_sql_task(element, ctx),
        _ => ExecutableKind::Generic,
    };
    tracing::trace!(executable_type = %executable_type, kind = kind.label(), "built executable");

    ExecutableNode {
        id: element.attribute(ctx.dts("refId")).map(str::to_string),
        executable_type,
        name: element.attribute(ctx.dts("ObjectName")).map(str::to_string),
        tag: element.tag_name().name().to_string(),
        kind,
        children: build_executables(element, ctx),
    }
}
