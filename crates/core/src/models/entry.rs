use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of money for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money coming in (salary, refunds, ...)
    Income,
    /// Money going out (rent, groceries, ...)
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }

    /// Case-insensitive parse of the stored/CLI spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Some(EntryType::Income),
            "expense" => Some(EntryType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Income => write!(f, "Income"),
            EntryType::Expense => write!(f, "Expense"),
        }
    }
}

/// Opaque, never-reused entry identifier.
///
/// New ids are time-ordered UUIDv7 strings. Ids loaded from older data
/// (numeric millisecond timestamps) are kept verbatim as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique identifier, immutable after creation
    pub id: EntryId,

    /// Trimmed, never empty
    pub description: String,

    /// Always strictly positive; the sign comes from `entry_type`
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Resolved category (falls back to a per-type label when left blank)
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Set once at creation; edits keep the original value
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Signed contribution of this entry to a balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Income => self.amount,
            EntryType::Expense => -self.amount,
        }
    }
}

/// Raw form values, exactly as typed by the user.
///
/// Nothing here is trusted: the validator trims, parses and checks every
/// field before an [`Entry`] is built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInput {
    pub description: String,
    pub amount: String,
    pub entry_type: EntryType,
    pub category: String,
    pub subcategory: Option<String>,
    pub payment_method: Option<String>,
}

impl EntryInput {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        entry_type: EntryType,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            entry_type,
            category: String::new(),
            subcategory: None,
            payment_method: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    /// Pre-fill the form from an existing entry (start of an edit).
    pub fn from_entry(entry: &Entry, locale: &super::settings::LocaleSettings) -> Self {
        Self {
            description: entry.description.clone(),
            amount: crate::services::amount_format::format_amount(entry.amount, locale),
            entry_type: entry.entry_type,
            category: entry.category.clone(),
            subcategory: entry.subcategory.clone(),
            payment_method: entry.payment_method.clone(),
        }
    }
}
