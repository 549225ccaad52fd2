pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod package;
pub mod types;

pub use config::{ConfigLoader, FlattenConfig};
pub use discovery::discover_packages;
pub use error::{AppError, DefaultErrorReporter, ErrorReporter};
pub use orchestrator::{BatchOrchestrator, BatchOutcome, DocumentReport};
pub use package::{extract_document, extract_rows, PackageDocument, Row};
pub use types::*;
