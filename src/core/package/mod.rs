//! Package extraction: parse a `.dtsx` document into an executable tree and flatten it.

pub mod builder;
pub mod extractors;
pub mod flatten;
pub mod model;
pub mod namespace;

pub use builder::build_executables;
pub use flatten::{flatten, Row};
pub use model::{ExecutableKind, ExecutableNode, PipelineComponent};
pub use namespace::NamespaceContext;

use std::fs;
use std::path::{Path, PathBuf};

/// Failure to extract a single document. Fatal for that document only.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("document does not declare the {prefix} namespace ({uri})")]
    MissingNamespace { prefix: String, uri: String },
}

/// Extraction failure tagged with the originating document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", .document.display())]
    Read {
        document: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to extract {}: {source}", .document.display())]
    Extract {
        document: PathBuf,
        #[source]
        source: ExtractError,
    },
}

impl DocumentError {
    pub fn document(&self) -> &Path {
        match self {
            DocumentError::Read { document, .. } | DocumentError::Extract { document, .. } => {
                document
            }
        }
    }
}

/// Executable tree extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDocument {
    pub path: PathBuf,
    pub executables: Vec<ExecutableNode>,
}

impl PackageDocument {
    /// Read and extract the document at `path`.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            document: path.to_path_buf(),
            source,
        })?;
        let executables = extract_document(&text).map_err(|source| DocumentError::Extract {
            document: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            document = %path.display(),
            executables = executables.iter().map(ExecutableNode::subtree_len).sum::<usize>(),
            "extracted package"
        );
        Ok(Self {
            path: path.to_path_buf(),
            executables,
        })
    }

    pub fn rows(&self) -> Vec<Row> {
        flatten(&self.executables, None)
    }
}

/// Parse `xml` and build the root-level executables of its top-level container.
pub fn extract_document(xml: &str) -> Result<Vec<ExecutableNode>, ExtractError> {
    let document = roxmltree::Document::parse(xml)?;
    let root = document.root_element();
    let ctx = NamespaceContext::resolve(root)?;
    Ok(build_executables(root, &ctx))
}

/// Parse, build, and flatten `xml` in one step.
pub fn extract_rows(xml: &str) -> Result<Vec<Row>, ExtractError> {
    Ok(flatten(&extract_document(xml)?, None))
}
