use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while building, mutating or numbering invoices.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// A caller-supplied argument is outside its allowed range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The operation is not allowed in the invoice's current status.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// Invoice number could not be parsed or formatted.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// Amount exceeds the largest magnitude the words converter names.
    #[error("amount {0} is outside the supported range for words conversion")]
    AmountOutOfRange(Decimal),

    /// Lost every atomic-update race for a sequence period; safe to retry later.
    #[error("transient conflict on sequence {period} after {attempts} attempts")]
    TransientConflict { period: String, attempts: u32 },

    /// The sequence store could not be reached or failed.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Settings could not be loaded or are inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "lines[0].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Short rule identifier if applicable (e.g. "LINE-BARIS").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

/// Join a list of validation errors into one `InvoiceError::Validation`.
pub(crate) fn join_errors(errors: &[ValidationError]) -> InvoiceError {
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    InvoiceError::Validation(msg)
}
