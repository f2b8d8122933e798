use rust_decimal::Decimal;

use crate::errors::ValidationError;
use crate::models::catalog::CategoryPolicy;
use crate::models::entry::{EntryInput, EntryType};
use crate::models::settings::LedgerSettings;

use super::amount_format::{parse_amount, ParseAmountError, MAX_AMOUNT};

/// Form values after every rule passed: trimmed, parsed, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInput {
    pub description: String,
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub category: String,
    pub subcategory: Option<String>,
    pub payment_method: Option<String>,
}

/// Working state threaded through the rules. Rules read the raw input and
/// may fill in the parsed amount for the rules after them.
#[derive(Debug)]
pub struct Draft<'a> {
    pub input: &'a EntryInput,
    pub settings: &'a LedgerSettings,
    pub amount: Option<Decimal>,
}

/// A named check, evaluated in list order.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&mut Draft<'_>) -> Result<(), ValidationError>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

pub const DESCRIPTION_PRESENT: Rule = Rule {
    name: "description_present",
    check: description_present,
};

pub const AMOUNT_PRESENT: Rule = Rule {
    name: "amount_present",
    check: amount_present,
};

pub const AMOUNT_PARSES: Rule = Rule {
    name: "amount_parses",
    check: amount_parses,
};

pub const AMOUNT_POSITIVE: Rule = Rule {
    name: "amount_positive",
    check: amount_positive,
};

pub const AMOUNT_WITHIN_LIMIT: Rule = Rule {
    name: "amount_within_limit",
    check: amount_within_limit,
};

pub const CATALOG_MEMBERSHIP: Rule = Rule {
    name: "catalog_membership",
    check: catalog_membership,
};

fn description_present(draft: &mut Draft<'_>) -> Result<(), ValidationError> {
    if draft.input.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    Ok(())
}

fn amount_present(draft: &mut Draft<'_>) -> Result<(), ValidationError> {
    if draft.input.amount.trim().is_empty() {
        return Err(ValidationError::MissingAmount);
    }
    Ok(())
}

fn amount_parses(draft: &mut Draft<'_>) -> Result<(), ValidationError> {
    match parse_amount(&draft.input.amount, &draft.settings.locale) {
        Ok(amount) => {
            draft.amount = Some(amount);
            Ok(())
        }
        Err(ParseAmountError::Empty) => Err(ValidationError::MissingAmount),
        Err(ParseAmountError::InvalidFormat(raw)) => Err(ValidationError::InvalidAmount(raw)),
    }
}

fn amount_positive(draft: &mut Draft<'_>) -> Result<(), ValidationError> {
    match draft.amount {
        Some(amount) if amount > Decimal::ZERO => Ok(()),
        Some(_) => Err(ValidationError::NonPositiveAmount),
        // only reachable when the rule list skips amount_parses
        None => Err(ValidationError::InvalidAmount(draft.input.amount.trim().to_string())),
    }
}

fn amount_within_limit(draft: &mut Draft<'_>) -> Result<(), ValidationError> {
    match draft.amount {
        Some(amount) if amount > MAX_AMOUNT => Err(ValidationError::AmountTooLarge),
        _ => Ok(()),
    }
}

fn catalog_membership(draft: &mut Draft<'_>) -> Result<(), ValidationError> {
    let CategoryPolicy::Curated(catalog) = &draft.settings.category_policy else {
        return Ok(());
    };

    let category = resolve_category(draft.input, draft.settings);
    if !catalog.has_category(&category) {
        return Err(ValidationError::UnknownCategory(category));
    }

    if let Some(sub) = non_blank(draft.input.subcategory.as_deref()) {
        if !catalog.has_subcategory(&category, &sub) {
            return Err(ValidationError::UnknownSubcategory {
                category,
                subcategory: sub,
            });
        }
    }

    if let Some(method) = non_blank(draft.input.payment_method.as_deref()) {
        if !catalog.accepts_payment_method(&method) {
            return Err(ValidationError::UnknownPaymentMethod(method));
        }
    }

    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trimmed category, or the per-type fallback label when blank.
pub fn resolve_category(input: &EntryInput, settings: &LedgerSettings) -> String {
    let category = input.category.trim();
    if category.is_empty() {
        settings.fallback_category(input.entry_type).to_string()
    } else {
        category.to_string()
    }
}

/// Ordered list of rules; the first failing rule decides the error.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<Rule>,
}

impl Validator {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn validate(
        &self,
        input: &EntryInput,
        settings: &LedgerSettings,
    ) -> Result<ValidInput, ValidationError> {
        let mut draft = Draft {
            input,
            settings,
            amount: None,
        };

        for rule in &self.rules {
            (rule.check)(&mut draft)?;
        }

        let amount = match draft.amount {
            Some(amount) => amount,
            None => parse_amount(&input.amount, &settings.locale)
                .map_err(|_| ValidationError::InvalidAmount(input.amount.trim().to_string()))?,
        };
        // entries never hold an amount outside (0, MAX_AMOUNT], whatever the rule list
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge);
        }

        Ok(ValidInput {
            description: input.description.trim().to_string(),
            amount,
            entry_type: input.entry_type,
            category: resolve_category(input, settings),
            subcategory: non_blank(input.subcategory.as_deref()),
            payment_method: non_blank(input.payment_method.as_deref()),
        })
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(vec![
            DESCRIPTION_PRESENT,
            AMOUNT_PRESENT,
            AMOUNT_PARSES,
            AMOUNT_POSITIVE,
            AMOUNT_WITHIN_LIMIT,
            CATALOG_MEMBERSHIP,
        ])
    }
}
