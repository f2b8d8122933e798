use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::CategoryPolicy;
use super::entry::EntryType;

/// Storage key used by the current generation of the app.
pub const DEFAULT_STORAGE_KEY: &str = "FINANCEAPP_TRANSACTIONS_V1";

/// Number formatting conventions for amount input and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSettings {
    /// Prefix used when displaying money (e.g., "R$", "€", "$").
    pub currency_symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

/// User-configurable ledger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Key under which the whole entry collection is stored.
    pub storage_key: String,

    /// Offset applied when deciding which month an entry belongs to.
    pub utc_offset_minutes: i32,

    /// Category used when an income is saved with a blank category.
    pub income_fallback_category: String,

    /// Category used when an expense is saved with a blank category.
    pub expense_fallback_category: String,

    pub locale: LocaleSettings,

    pub category_policy: CategoryPolicy,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            utc_offset_minutes: 0,
            income_fallback_category: "Receita".to_string(),
            expense_fallback_category: "Despesa".to_string(),
            locale: LocaleSettings::default(),
            category_policy: CategoryPolicy::FreeText,
        }
    }
}

impl LedgerSettings {
    pub fn fallback_category(&self, entry_type: EntryType) -> &str {
        match entry_type {
            EntryType::Income => &self.income_fallback_category,
            EntryType::Expense => &self.expense_fallback_category,
        }
    }

    /// Configured offset; out-of-range values fall back to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }
}
