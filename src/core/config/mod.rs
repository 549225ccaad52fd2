pub mod loader;

pub use loader::ConfigLoader;

use crate::core::export::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the configuration file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "dtsx-flatten.toml";

/// Main configuration loaded from dtsx-flatten.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FlattenConfig {
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Document discovery configuration
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory receiving one table per source document
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Table format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// File extension identifying package documents, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Follow symbolic links while walking directories
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            follow_links: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dtsx-flatten-output")
}

fn default_extension() -> String {
    "dtsx".to_string()
}
