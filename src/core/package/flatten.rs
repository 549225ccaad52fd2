use crate::core::package::model::{ExecutableKind, ExecutableNode, PipelineComponent};
use indexmap::IndexMap;
use serde::Serialize;

pub const EXECUTABLE_ID: &str = "ExecutableID";
pub const EXECUTABLE_TYPE: &str = "ExecutableType";
pub const EXECUTABLE_NAME: &str = "ExecutableName";
pub const TAG: &str = "Tag";
pub const PARENT_EXECUTABLE_ID: &str = "ParentExecutableID";
pub const PACKAGE_NAME: &str = "PackageName";
pub const CONNECTION_ID: &str = "ConnectionID";
pub const SQL_STATEMENT_SOURCE: &str = "SqlStatementSource";
pub const COMPONENT_NAME: &str = "ComponentName";
pub const COMPONENT_TYPE: &str = "ComponentType";
pub const PROPERTY_PREFIX: &str = "Property_";

/// Columns present on every row, in output order.
pub const BASE_COLUMNS: [&str; 8] = [
    EXECUTABLE_ID,
    EXECUTABLE_TYPE,
    EXECUTABLE_NAME,
    TAG,
    PARENT_EXECUTABLE_ID,
    PACKAGE_NAME,
    CONNECTION_ID,
    SQL_STATEMENT_SOURCE,
];

/// Columns present on rows derived from pipeline components, before the property columns.
pub const COMPONENT_COLUMNS: [&str; 2] = [COMPONENT_NAME, COMPONENT_TYPE];

/// One flattened output row: column name to optional value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, Option<String>>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|value| value.as_deref())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_deref()))
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.get(PARENT_EXECUTABLE_ID)
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.get(&format!("{PROPERTY_PREFIX}{name}"))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn set(&mut self, column: impl Into<String>, value: Option<&str>) {
        self.cells.insert(column.into(), value.map(str::to_string));
    }
}

/// Flatten `nodes` depth-first, pre-order. Root-level callers pass `parent_id = None`.
pub fn flatten(nodes: &[ExecutableNode], parent_id: Option<&str>) -> Vec<Row> {
    let mut rows = Vec::new();
    for node in nodes {
        flatten_node(node, parent_id, &mut rows);
    }
    rows
}

fn flatten_node(node: &ExecutableNode, parent_id: Option<&str>, rows: &mut Vec<Row>) {
    let base = base_row(node, parent_id);
    match &node.kind {
        ExecutableKind::Pipeline { components } if !components.is_empty() => {
            rows.extend(
                components
                    .iter()
                    .map(|component| component_row(base.clone(), component)),
            );
        }
        _ => rows.push(base),
    }

    for child in &node.children {
        flatten_node(child, node.id.as_deref(), rows);
    }
}

fn base_row(node: &ExecutableNode, parent_id: Option<&str>) -> Row {
    let (package_name, connection_id, statement) = match &node.kind {
        ExecutableKind::PackageReference { package_name } => (package_name.as_deref(), None, None),
        ExecutableKind::SqlTask {
            connection_id,
            statement,
        } => (None, connection_id.as_deref(), statement.as_deref()),
        ExecutableKind::Pipeline { .. } | ExecutableKind::Generic => (None, None, None),
    };

    let mut row = Row::default();
    row.set(EXECUTABLE_ID, node.id.as_deref());
    row.set(EXECUTABLE_TYPE, Some(node.executable_type.as_str()));
    row.set(EXECUTABLE_NAME, node.name.as_deref());
    row.set(TAG, Some(node.tag.as_str()));
    row.set(PARENT_EXECUTABLE_ID, parent_id);
    row.set(PACKAGE_NAME, package_name);
    row.set(CONNECTION_ID, connection_id);
    row.set(SQL_STATEMENT_SOURCE, statement);
    row
}

fn component_row(mut row: Row, component: &PipelineComponent) -> Row {
    row.set(COMPONENT_NAME, component.name.as_deref());
    row.set(COMPONENT_TYPE, component.type_id.as_deref());
    for (key, value) in &component.properties {
        row.set(format!("{PROPERTY_PREFIX}{key}"), Some(value.as_str()));
    }
    row
}
