use thiserror::Error;

/// Reasons a form submission is rejected.
///
/// Each variant maps to exactly one validation rule, and its `Display`
/// output is the message shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a description")]
    MissingDescription,

    #[error("Please enter an amount")]
    MissingAmount,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Amount is too large")]
    AmountTooLarge,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Subcategory '{subcategory}' does not belong to category '{category}'")]
    UnknownSubcategory {
        category: String,
        subcategory: String,
    },

    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

/// Unified error type for the whole financeapp-core library.
/// Every fallible public function returns `Result<T, LedgerError>`.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ── Business Logic ──────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    // ── Storage ─────────────────────────────────────────────────────
    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid storage format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported storage version: {0}")]
    UnsupportedVersion(u16),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl LedgerError {
    /// The validation failure behind this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            LedgerError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Deserialization(e.to_string())
    }
}
