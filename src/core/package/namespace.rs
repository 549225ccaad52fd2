use crate::core::package::ExtractError;
use roxmltree::Node;

/// Prefix used by the package dialect for structural elements and attributes.
pub const DTS_PREFIX: &str = "DTS";
/// URI bound to [`DTS_PREFIX`].
pub const DTS_URI: &str = "www.microsoft.com/SqlServer/Dts";
/// Prefix used by the Execute SQL task payload.
pub const SQL_TASK_PREFIX: &str = "SQLTask";
/// URI bound to [`SQL_TASK_PREFIX`].
pub const SQL_TASK_URI: &str = "www.microsoft.com/sqlserver/dts/tasks/sqltask";

/// Immutable addressing context threaded through every extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceContext {
    dts: String,
    sql_task: String,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self {
            dts: DTS_URI.to_string(),
            sql_task: SQL_TASK_URI.to_string(),
        }
    }
}

impl NamespaceContext {
    /// Resolve the context for a document rooted at `root`.
    ///
    /// The primary namespace must be declared on the root element. The SQL task namespace is
    /// only declared by packages that contain SQL tasks, so its absence is tolerated.
    pub fn resolve(root: Node<'_, '_>) -> Result<Self, ExtractError> {
        let declared = root.namespaces().any(|ns| ns.uri() == DTS_URI);
        if !declared {
            return Err(ExtractError::MissingNamespace {
                prefix: DTS_PREFIX.to_string(),
                uri: DTS_URI.to_string(),
            });
        }
        Ok(Self::default())
    }

    /// Fixed prefix → URI bindings, in declaration order.
    pub fn prefixes(&self) -> [(&'static str, &str); 2] {
        [(DTS_PREFIX, &self.dts), (SQL_TASK_PREFIX, &self.sql_task)]
    }

    pub fn uri_for(&self, prefix: &str) -> Option<&str> {
        self.prefixes()
            .into_iter()
            .find(|(candidate, _)| *candidate == prefix)
            .map(|(_, uri)| uri)
    }

    /// Qualified name in the primary namespace.
    pub fn dts<'a>(&'a self, local: &'a str) -> (&'a str, &'a str) {
        (self.dts.as_str(), local)
    }

    /// Qualified name in the SQL task namespace.
    pub fn sql_task<'a>(&'a self, local: &'a str) -> (&'a str, &'a str) {
        (self.sql_task.as_str(), local)
    }
}
