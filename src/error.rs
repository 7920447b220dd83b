use thiserror::Error;

/// Structured error context for verifier diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Configuration key or capability name that caused the error (e.g., "GATEWAY_VERIFIER_PROBE")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "verifier_config", "sandbox")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the verifier.
///
/// Only [`Error::UnknownCapability`] and [`Error::Configuration`] surface to callers.
/// The provider-side variants are produced inside a verification pass and recorded
/// into the report as text.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown capability '{name}'")]
    UnknownCapability { name: String },

    #[error("Provider '{provider}' could not be constructed: {reason}")]
    ProviderConstructionFailed { provider: String, reason: String },

    #[error("Invocation of '{operation}' failed: {reason}")]
    InvocationFailed { operation: String, reason: String },

    #[error("Provider '{provider}' exposes no operation registry")]
    ReflectionUnavailable { provider: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn unknown_capability(name: impl Into<String>) -> Self {
        Error::UnknownCapability { name: name.into() }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
