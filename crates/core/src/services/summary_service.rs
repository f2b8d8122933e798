use chrono::FixedOffset;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::entry::{Entry, EntryType};
use crate::models::month::Month;
use crate::models::summary::{CategoryTotal, MonthlySummary};

/// Derives the monthly figures shown by the summary view.
///
/// Everything here is a pure function of the entry slice and the
/// reference month, so results can be recomputed at any time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Entries whose `created_at` falls in `month` (seen from `offset`).
    pub fn entries_in_month<'a>(
        &self,
        entries: &'a [Entry],
        month: Month,
        offset: FixedOffset,
    ) -> Vec<&'a Entry> {
        entries
            .iter()
            .filter(|e| month.contains(e.created_at, offset))
            .collect()
    }

    /// Income, expense, balance and average expense for `month`.
    ///
    /// Totals saturate at `Decimal::MAX` instead of overflowing.
    pub fn aggregate(&self, entries: &[Entry], month: Month, offset: FixedOffset) -> MonthlySummary {
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        let mut income_count = 0usize;
        let mut expense_count = 0usize;

        for entry in self.entries_in_month(entries, month, offset) {
            match entry.entry_type {
                EntryType::Income => {
                    total_income = total_income.saturating_add(entry.amount);
                    income_count += 1;
                }
                EntryType::Expense => {
                    total_expense = total_expense.saturating_add(entry.amount);
                    expense_count += 1;
                }
            }
        }

        let average_expense = if expense_count > 0 {
            total_expense / Decimal::from(expense_count)
        } else {
            Decimal::ZERO
        };

        MonthlySummary {
            month,
            total_income,
            total_expense,
            balance: total_income.saturating_sub(total_expense),
            average_expense,
            income_count,
            expense_count,
        }
    }

    /// Per-category totals of one entry type in `month`, largest first.
    pub fn category_breakdown(
        &self,
        entries: &[Entry],
        month: Month,
        offset: FixedOffset,
        entry_type: EntryType,
    ) -> Vec<CategoryTotal> {
        let mut by_category: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
        let mut grand_total = Decimal::ZERO;

        for entry in self.entries_in_month(entries, month, offset) {
            if entry.entry_type != entry_type {
                continue;
            }
            let slot = by_category.entry(entry.category.as_str()).or_insert((Decimal::ZERO, 0));
            slot.0 = slot.0.saturating_add(entry.amount);
            slot.1 += 1;
            grand_total = grand_total.saturating_add(entry.amount);
        }

        let mut totals: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category: category.to_string(),
                entry_type,
                total,
                count,
                percentage: share_of(total, grand_total),
            })
            .collect();

        // BTreeMap order is alphabetical, so equal totals stay alphabetical
        totals.sort_by(|a, b| b.total.cmp(&a.total));
        totals
    }
}

/// `part` as a percentage of `whole`, two decimals. The ratio is taken
/// first so the multiplication stays within 0..=100.
fn share_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}
