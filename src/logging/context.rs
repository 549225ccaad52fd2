use crate::cli::Command;
use std::env;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Commands run by a person at a terminal.
    Interactive,
    /// Commands whose stdout carries data, so logs must never reach stdout.
    DataStream,
    /// Unattended runs (schedulers, CI) that should be quiet on the console.
    Batch,
}

impl ExecutionContext {
    /// Returns `true` when console sinks should be disabled.
    pub fn disables_console(self) -> bool {
        matches!(self, ExecutionContext::Batch)
    }
}

/// Derive the active execution context from a parsed CLI command plus overrides.
pub fn detect_context(command: &Command) -> ExecutionContext {
    if batch_override_enabled() {
        return ExecutionContext::Batch;
    }

    match command {
        Command::Inspect(_) | Command::Scan(_) => ExecutionContext::DataStream,
        Command::Flatten(_) => ExecutionContext::Interactive,
    }
}

fn batch_override_enabled() -> bool {
    env::var("DTSX_FLATTEN_BATCH")
        .map(|value| value.trim() == "1")
        .unwrap_or(false)
}
