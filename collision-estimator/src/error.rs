/// Failure of an estimation request.
///
/// Neither variant is fatal: callers are expected to show "no result" and wait
/// for the next input change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("{field} exceeds the representable range (limit: {limit})")]
    Overflow { field: &'static str, limit: String },
}

impl DomainError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field, reason: reason.into() }
    }

    pub(crate) fn overflow(field: &'static str, limit: impl ToString) -> Self {
        Self::Overflow { field, limit: limit.to_string() }
    }

    /// True for the errors that should be rendered as a missing result rather than
    /// reported as a hard failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
