use serde::Serialize;
use std::collections::BTreeMap;

/// Declared type of an Execute Package task.
pub const PACKAGE_REFERENCE_TYPE: &str = "Microsoft.ExecutePackageTask";
/// Declared type of a data-flow task.
pub const PIPELINE_TYPE: &str = "Microsoft.Pipeline";
/// Declared type of an Execute SQL task.
pub const SQL_TASK_TYPE: &str = "Microsoft.ExecuteSQLTask";

/// One executable parsed from a package, with its nested executables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutableNode {
    pub id: Option<String>,
    pub executable_type: String,
    pub name: Option<String>,
    pub tag: String,
    #[serde(flatten)]
    pub kind: ExecutableKind,
    pub children: Vec<ExecutableNode>,
}

/// Type-specific payload of an executable.
///
/// Each variant carries only the fields its extractor produces, so a node can never mix
/// fields from two extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutableKind {
    PackageReference {
        package_name: Option<String>,
    },
    Pipeline {
        components: Vec<PipelineComponent>,
    },
    SqlTask {
        connection_id: Option<String>,
        statement: Option<String>,
    },
    Generic,
}

impl ExecutableKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExecutableKind::PackageReference { .. } => "package_reference",
            ExecutableKind::Pipeline { .. } => "pipeline",
            ExecutableKind::SqlTask { .. } => "sql_task",
            ExecutableKind::Generic => "generic",
        }
    }
}

/// A component inside a data-flow pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineComponent {
    pub name: Option<String>,
    pub type_id: Option<String>,
    pub properties: BTreeMap<String, String>,
}

impl ExecutableNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ExecutableNode::subtree_len)
            .sum::<usize>()
    }

    pub fn components(&self) -> &[PipelineComponent] {
        match &self.kind {
            ExecutableKind::Pipeline { components } => components,
            _ => &[],
        }
    }
}
