//! Error types

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - resolution or translation cannot proceed
    Error,
    /// Warning - potential issue but can continue
    Warning,
    /// Information - informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with its subject and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// What the diagnostic is about (a store type, an operation)
    pub subject: Option<String>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            subject: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            subject: None,
            help: None,
        }
    }

    /// Set the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with terminal colors
    #[cfg(feature = "colored")]
    pub fn to_colored_string(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => self.severity.to_string().red().bold(),
            Severity::Warning => self.severity.to_string().yellow().bold(),
            Severity::Info => self.severity.to_string().blue().bold(),
        };
        let mut out = format!("{}[{}]: {}", severity, self.code, self.message);
        if let Some(subject) = &self.subject {
            out.push_str(&format!("\n  {} {}", "-->".blue(), subject));
        }
        if let Some(help) = self.help.as_deref().or(self.code.info().help) {
            out.push_str(&format!("\n  {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(subject) = &self.subject {
            write!(f, " ({})", subject)?;
        }
        Ok(())
    }
}

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum KbError {
    /// Unmappable store type / host type combination
    #[error("{code}: {message}")]
    Mapping {
        code: ErrorCode,
        message: String,
        store_type: Option<String>,
        context: Option<String>,
    },

    /// Unsupported dynamic translation input
    #[error("{code}: {message}")]
    Translation {
        code: ErrorCode,
        message: String,
        operation: Option<String>,
        context: Option<String>,
    },

    /// Literal-generation domain error
    #[error("{code}: {message}")]
    Literal {
        code: ErrorCode,
        message: String,
        store_type: Option<String>,
        context: Option<String>,
    },

    /// Malformed declarative combination
    #[error("{code}: {message}")]
    Configuration {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<KbError>),
}

impl KbError {
    /// Create a mapping error
    pub fn mapping(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Mapping {
            code,
            message: message.into(),
            store_type: None,
            context: None,
        }
    }

    /// Create a translation error
    pub fn translation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Translation {
            code,
            message: message.into(),
            operation: None,
            context: None,
        }
    }

    /// Create a literal error
    pub fn literal(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Literal {
            code,
            message: message.into(),
            store_type: None,
            context: None,
        }
    }

    /// Create a configuration error
    pub fn configuration(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Configuration {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Mapping { code, .. } => *code,
            Self::Translation { code, .. } => *code,
            Self::Literal { code, .. } => *code,
            Self::Configuration { code, .. } => *code,
            Self::Multiple(errors) => errors.first().map(|e| e.code()).unwrap_or(ErrorCode::new(0)),
        }
    }

    /// Get the subject (store type or operation) if available
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Mapping { store_type, .. } => store_type.as_deref(),
            Self::Translation { operation, .. } => operation.as_deref(),
            Self::Literal { store_type, .. } => store_type.as_deref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Mapping { code, message, store_type, context }
            | Self::Literal { code, message, store_type, context } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(store_type) = store_type {
                    diag = diag.with_subject(store_type.clone());
                }
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
            Self::Translation { code, message, operation, context } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(operation) = operation {
                    diag = diag.with_subject(operation.clone());
                }
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
            Self::Configuration { code, message, context } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
            Self::Multiple(errors) => {
                if let Some(first) = errors.first() {
                    first.to_diagnostic()
                } else {
                    Diagnostic::error(ErrorCode::new(0), "Unknown error")
                }
            }
        }
    }
}

/// Builder for creating errors with fluent API
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    subject: Option<String>,
    context: Option<String>,
}

impl ErrorBuilder {
    /// Create a new error builder
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            subject: None,
            context: None,
        }
    }

    /// Set the subject (store type or operation)
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add context information
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build a mapping error
    pub fn mapping(self) -> KbError {
        KbError::Mapping {
            code: self.code,
            message: self.message,
            store_type: self.subject,
            context: self.context,
        }
    }

    /// Build a translation error
    pub fn translation(self) -> KbError {
        KbError::Translation {
            code: self.code,
            message: self.message,
            operation: self.subject,
            context: self.context,
        }
    }

    /// Build a literal error
    pub fn literal(self) -> KbError {
        KbError::Literal {
            code: self.code,
            message: self.message,
            store_type: self.subject,
            context: self.context,
        }
    }

    /// Build a configuration error
    pub fn configuration(self) -> KbError {
        KbError::Configuration {
            code: self.code,
            message: self.message,
            context: self.context,
        }
    }
}
