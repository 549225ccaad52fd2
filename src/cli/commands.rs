use crate::{
    cli::args::{FlattenArgs, InspectArgs, ScanArgs},
    core::{
        config::CONFIG_FILE_NAME, discover_packages, BatchOrchestrator, ConfigLoader,
        DefaultErrorReporter, FlattenConfig, PackageDocument,
    },
    utils::serialization::{FileSerializer, FileUtils, JsonSerializer},
    Result,
};
use anyhow::{anyhow, Context};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolve configuration: defaults, config file, env overrides, then CLI flags.
fn load_config(config_path: Option<&Path>) -> Result<FlattenConfig> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(CONFIG_FILE_NAME),
    };
    if config_path.is_some() && !path.exists() {
        return Err(anyhow!("config file {} does not exist", path.display()));
    }
    ConfigLoader::load(&path).map_err(|err| anyhow!(err.message))
}

pub async fn flatten(args: FlattenArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(output) = args.output {
        config.output.dir = output;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(extension) = args.extension {
        config.discovery.extension = extension;
    }
    ConfigLoader::validate_config(&config).map_err(|err| anyhow!(err.message))?;

    let documents = discover_packages(&args.path, &config.discovery)
        .map_err(|err| anyhow!(err.message))?;
    if documents.is_empty() {
        tracing::warn!(
            "no .{} packages found under {}",
            config.discovery.extension,
            args.path.display()
        );
    }

    let orchestrator = BatchOrchestrator::new(
        Arc::from(config.output.format.writer()),
        Box::new(DefaultErrorReporter),
        config.output.dir.clone(),
    );
    let outcome = orchestrator.run(documents).await;

    if let Some(report_path) = &args.report {
        FileUtils
            .save_to_file(report_path, &outcome, &JsonSerializer)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
    }

    let summary = &outcome.summary;
    println!(
        "{} package(s): {} exported, {} failed, {} row(s) written to {}",
        summary.documents,
        summary.exported,
        summary.failed,
        summary.rows,
        config.output.dir.display()
    );
    for report in outcome.documents.iter().filter(|r| r.error.is_some()) {
        println!(
            "  failed: {} ({})",
            report.document.display(),
            report.error.as_deref().unwrap_or_default()
        );
    }

    if summary.has_failures() {
        return Err(anyhow!("{} package(s) failed to flatten", summary.failed));
    }
    Ok(())
}

pub fn inspect(args: InspectArgs) -> Result<()> {
    let package = PackageDocument::load(&args.file)?;
    let json = if args.rows {
        serde_json::to_string_pretty(&package.rows())?
    } else {
        serde_json::to_string_pretty(&package.executables)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

pub fn scan(args: ScanArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(extension) = args.extension {
        config.discovery.extension = extension;
    }
    ConfigLoader::validate_config(&config).map_err(|err| anyhow!(err.message))?;

    let documents = discover_packages(&args.path, &config.discovery)
        .map_err(|err| anyhow!(err.message))?;
    let mut stdout = std::io::stdout().lock();
    for document in &documents {
        writeln!(stdout, "{}", document.display())?;
    }
    tracing::info!("{} package(s) found", documents.len());
    Ok(())
}
