use crate::core::package::{DocumentError, ExtractError};
use crate::core::types::{ErrorCategory, ErrorSeverity};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub context: HashMap<String, String>,
    pub recovery_suggestions: Vec<String>,
    pub occurred_at: DateTime<Utc>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        let severity = match category {
            ErrorCategory::ValidationError
            | ErrorCategory::ParseError
            | ErrorCategory::StructuralError
            | ErrorCategory::ConfigError
            | ErrorCategory::ExportError
            | ErrorCategory::SerializationError
            | ErrorCategory::IoError
            | ErrorCategory::InternalError => ErrorSeverity::Error,
            ErrorCategory::Unknown => ErrorSeverity::Info,
        };
        AppError {
            category,
            severity,
            code: format!("ERR-{}", uuid::Uuid::new_v4()),
            message: message.into(),
            context: HashMap::new(),
            recovery_suggestions: vec![],
            occurred_at: chrono::Utc::now(),
            source: None,
        }
    }

    pub fn with_source<T: Into<String>>(
        category: ErrorCategory,
        message: T,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        let mut error = AppError::new(category, message);
        error.source = Some(anyhow::anyhow!(source));
        error
    }

    pub fn with_context<T: Into<String>>(mut self, context: T) -> Self {
        self.context.insert("context".to_string(), context.into());
        self
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_suggestion<T: Into<String>>(mut self, suggestion: T) -> Self {
        self.recovery_suggestions.push(suggestion.into());
        self
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    pub fn add_context(&mut self, key: &str, value: &str) {
        self.context.insert(key.to_string(), value.to_string());
    }

    /// Document the error is attributed to, when it came from a single document.
    pub fn document(&self) -> Option<&str> {
        self.context.get("document").map(String::as_str)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if !self.context.is_empty() {
            write!(f, " (Context: {:?})", self.context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError {
            category: ErrorCategory::InternalError,
            severity: ErrorSeverity::Error,
            code: "ANYHOW_ERROR".to_string(),
            message: e.to_string(),
            context: HashMap::new(),
            recovery_suggestions: vec!["Check the error details".to_string()],
            occurred_at: Utc::now(),
            source: Some(e),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError {
            category: ErrorCategory::IoError,
            severity: ErrorSeverity::Error,
            code: "IO_ERROR".to_string(),
            message: e.to_string(),
            context: HashMap::new(),
            recovery_suggestions: vec!["Check file permissions and paths".to_string()],
            occurred_at: Utc::now(),
            source: Some(anyhow::anyhow!(e)),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        let document = e.document().display().to_string();
        let (category, code, suggestion) = match &e {
            DocumentError::Read { .. } => (
                ErrorCategory::IoError,
                "DOCUMENT_READ",
                "Check that the package file exists and is readable",
            ),
            DocumentError::Extract {
                source: ExtractError::Xml(_),
                ..
            } => (
                ErrorCategory::ParseError,
                "DOCUMENT_XML",
                "Open the package in an XML editor and fix the reported position",
            ),
            DocumentError::Extract {
                source: ExtractError::MissingNamespace { .. },
                ..
            } => (
                ErrorCategory::StructuralError,
                "DOCUMENT_NAMESPACE",
                "Only SSIS package (.dtsx) documents are supported",
            ),
        };
        // The document lives in the context, so the message carries only the reason.
        let reason = match e {
            DocumentError::Read { source, .. } => source.to_string(),
            DocumentError::Extract { source, .. } => source.to_string(),
        };
        let mut error = AppError::new(category, reason)
            .with_code(code)
            .with_suggestion(suggestion);
        error.add_context("document", &document);
        error
    }
}

pub trait ErrorReporter {
    fn report_error(&self, error: &AppError);
    fn report_warning(&self, message: &str, context: Option<String>);
    fn report_info(&self, message: &str);
    fn report_debug(&self, message: &str);
}

/// Reporter that routes everything through `tracing`.
pub struct DefaultErrorReporter;

impl DefaultErrorReporter {
    pub fn new() -> Self {
        DefaultErrorReporter
    }
}

impl Default for DefaultErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter for DefaultErrorReporter {
    fn report_error(&self, error: &AppError) {
        tracing::error!(
            code = %error.code,
            category = %error.category,
            document = error.document().unwrap_or("-"),
            "{}",
            error.message
        );
        for suggestion in &error.recovery_suggestions {
            tracing::info!("  hint: {}", suggestion);
        }
    }

    fn report_warning(&self, message: &str, context: Option<String>) {
        match context {
            Some(ctx) => tracing::warn!(context = %ctx, "{}", message),
            None => tracing::warn!("{}", message),
        }
    }

    fn report_info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn report_debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }
}
