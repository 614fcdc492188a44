use thiserror::Error;

/// Errors that can occur during document construction or pipeline execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReconcileError {
    /// One or more construction invariants failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// Purchase order lookup collaborator failed.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Reasoning generation collaborator failed.
    #[error("reasoning error: {0}")]
    Reasoning(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "line_items[2].total_price").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Business rule identifier if applicable (e.g. "LINE_TOTAL_CONSISTENCY").
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
