use crate::core::export::OutputFormat;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Directory searched recursively for packages, or a single package file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Directory receiving one table per package (default: dtsx-flatten-output)
    #[arg(short, long, value_name = "DIR", help_heading = "Output Options")]
    pub output: Option<PathBuf>,

    /// Table format (default: csv)
    #[arg(short, long, value_enum, help_heading = "Output Options")]
    pub format: Option<OutputFormat>,

    /// Write a JSON report of every processed package to this file
    #[arg(long, value_name = "FILE", help_heading = "Output Options")]
    pub report: Option<PathBuf>,

    /// Package file extension to discover (default: dtsx)
    #[arg(long, value_name = "EXT", help_heading = "Discovery")]
    pub extension: Option<String>,

    /// Path to custom config file (default: ./dtsx-flatten.toml)
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Package file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the flattened rows instead of the executable tree
    #[arg(long)]
    pub rows: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory searched recursively for packages
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Package file extension to discover (default: dtsx)
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Path to custom config file (default: ./dtsx-flatten.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
