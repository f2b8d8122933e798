use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::EntryType;
use super::month::Month;

/// Totals for one reference month. Always derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month this summary was computed for
    pub month: Month,

    /// Sum of income amounts in the month
    pub total_income: Decimal,

    /// Sum of expense amounts in the month
    pub total_expense: Decimal,

    /// total_income - total_expense
    pub balance: Decimal,

    /// total_expense / expense_count, or zero when there are no expenses
    pub average_expense: Decimal,

    pub income_count: usize,

    pub expense_count: usize,
}

/// Per-category slice of a month, for the summary view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,

    pub entry_type: EntryType,

    pub total: Decimal,

    pub count: usize,

    /// Share of the month's total for `entry_type`, 0..=100, two decimals
    pub percentage: Decimal,
}
