// ═══════════════════════════════════════════════════════════════════
// Service Tests — LedgerService, Validator rules, amount formatting
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use financeapp_core::errors::{LedgerError, ValidationError};
use financeapp_core::models::entry::{Entry, EntryId, EntryInput, EntryType};
use financeapp_core::models::settings::{LedgerSettings, LocaleSettings};
use financeapp_core::services::amount_format::{
    format_amount, format_currency, normalize_masked_amount, parse_amount, MAX_MASK_DIGITS,
};
use financeapp_core::services::ledger_service::LedgerService;
use financeapp_core::services::validation::{
    self, Draft, Rule, Validator, AMOUNT_PARSES, AMOUNT_POSITIVE, AMOUNT_PRESENT,
    DESCRIPTION_PRESENT,
};
use financeapp_core::FinanceLedger;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn expense(description: &str, amount: &str) -> EntryInput {
    EntryInput::new(description, amount, EntryType::Expense)
}

// ═══════════════════════════════════════════════════════════════════
// LedgerService
// ═══════════════════════════════════════════════════════════════════

mod ledger_service {
    use super::*;

    fn seeded(svc: &LedgerService, settings: &LedgerSettings) -> Vec<Entry> {
        let mut entries = Vec::new();
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
        svc.add(&mut entries, &expense("Mercado", "100"), settings, now).unwrap();
        svc.add(
            &mut entries,
            &EntryInput::new("Salário", "5000", EntryType::Income),
            settings,
            now,
        )
        .unwrap();
        entries
    }

    #[test]
    fn add_prepends() {
        let svc = LedgerService::new();
        let settings = LedgerSettings::default();
        let entries = seeded(&svc, &settings);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "Salário");
        assert_eq!(entries[1].description, "Mercado");
    }

    #[test]
    fn add_uses_given_timestamp() {
        let svc = LedgerService::new();
        let settings = LedgerSettings::default();
        let mut entries = Vec::new();
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let e = svc.add(&mut entries, &expense("Ceia", "250"), &settings, ts).unwrap();
        assert_eq!(e.created_at, ts);
    }

    #[test]
    fn update_missing_id_after_valid_input() {
        let svc = LedgerService::new();
        let settings = LedgerSettings::default();
        let mut entries = seeded(&svc, &settings);
        let err = svc
            .update(&mut entries, &EntryId::from("nope"), &expense("x", "1"), &settings)
            .unwrap_err();
        assert!(matches!(err, LedgerError::EntryNotFound(_)));
    }

    #[test]
    fn update_reports_validation_before_lookup() {
        let svc = LedgerService::new();
        let settings = LedgerSettings::default();
        let mut entries = seeded(&svc, &settings);
        let err = svc
            .update(&mut entries, &EntryId::from("nope"), &expense("", "1"), &settings)
            .unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::MissingDescription));
    }

    #[test]
    fn remove_returns_removed_entry_once() {
        let svc = LedgerService::new();
        let settings = LedgerSettings::default();
        let mut entries = seeded(&svc, &settings);
        let id = entries[1].id.clone();

        let removed = svc.remove(&mut entries, &id).unwrap();
        assert_eq!(removed.description, "Mercado");
        assert!(svc.remove(&mut entries, &id).is_none());
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn filter_and_search() {
        let svc = LedgerService::new();
        let settings = LedgerSettings::default();
        let entries = seeded(&svc, &settings);
        assert_eq!(svc.get_entries_by_type(&entries, EntryType::Income).len(), 1);
        assert_eq!(svc.search(&entries, "MERC").len(), 1);
        assert_eq!(svc.search(&entries, "despesa").len(), 1);
        assert!(svc.search(&entries, "viagem").is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Validator
// ═══════════════════════════════════════════════════════════════════

mod validator {
    use super::*;

    fn no_shouting(draft: &mut Draft<'_>) -> Result<(), ValidationError> {
        let d = draft.input.description.trim();
        if !d.is_empty() && d.chars().all(|c| !c.is_lowercase()) {
            return Err(ValidationError::InvalidAmount("shouting".into()));
        }
        Ok(())
    }

    const NO_SHOUTING: Rule = Rule {
        name: "no_shouting",
        check: no_shouting,
    };

    #[test]
    fn default_rule_order() {
        let names: Vec<&str> = Validator::default().rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "description_present",
                "amount_present",
                "amount_parses",
                "amount_positive",
                "amount_within_limit",
                "catalog_membership",
            ]
        );
    }

    #[test]
    fn valid_input_is_normalized() {
        let settings = LedgerSettings::default();
        let input = expense("  Mercado ", " 1.234,56 ")
            .with_subcategory("  ")
            .with_payment_method(" Pix ");
        let valid = Validator::default().validate(&input, &settings).unwrap();
        assert_eq!(valid.description, "Mercado");
        assert_eq!(valid.amount, dec("1234.56"));
        assert_eq!(valid.category, "Despesa");
        assert_eq!(valid.subcategory, None);
        assert_eq!(valid.payment_method.as_deref(), Some("Pix"));
    }

    #[test]
    fn extra_rule_runs_in_list_order() {
        let settings = LedgerSettings::default();
        let validator = Validator::new(vec![DESCRIPTION_PRESENT, NO_SHOUTING, AMOUNT_PRESENT]);

        let err = validator.validate(&expense("ALUGUEL", ""), &settings).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAmount("shouting".into()));
        assert!(validator.validate(&expense("Aluguel", "10"), &settings).is_ok());
    }

    #[test]
    fn reordered_rules_change_which_error_wins() {
        let settings = LedgerSettings::default();
        let amount_first = Validator::new(vec![AMOUNT_PRESENT, DESCRIPTION_PRESENT]);
        assert_eq!(
            amount_first.validate(&expense("", ""), &settings),
            Err(ValidationError::MissingAmount)
        );
        assert_eq!(
            Validator::default().validate(&expense("", ""), &settings),
            Err(ValidationError::MissingDescription)
        );
    }

    #[test]
    fn positive_amount_is_enforced_without_rules() {
        let settings = LedgerSettings::default();
        let empty = Validator::new(Vec::new());
        assert_eq!(
            empty.validate(&expense("x", "0"), &settings),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            empty.validate(&expense("x", "abc"), &settings),
            Err(ValidationError::InvalidAmount("abc".into()))
        );
        assert!(empty.validate(&expense("x", "1"), &settings).is_ok());
    }

    #[test]
    fn amount_positive_without_amount_parses() {
        let settings = LedgerSettings::default();
        let v = Validator::new(vec![AMOUNT_POSITIVE]);
        assert_eq!(
            v.validate(&expense("x", "10"), &settings),
            Err(ValidationError::InvalidAmount("10".into()))
        );
        let v = Validator::new(vec![AMOUNT_PARSES, AMOUNT_POSITIVE]);
        assert!(v.validate(&expense("x", "10"), &settings).is_ok());
    }

    #[test]
    fn ledger_with_custom_validator() {
        let mut ledger = FinanceLedger::in_memory(LedgerSettings::default())
            .with_validator(Validator::new(vec![DESCRIPTION_PRESENT, NO_SHOUTING]));
        assert!(ledger.add_entry(&expense("UBER", "10")).is_err());
        assert!(ledger.add_entry(&expense("Uber", "10")).is_ok());
        assert_eq!(ledger.entry_count(), 1);
    }

    #[test]
    fn resolve_category_falls_back_per_type() {
        let settings = LedgerSettings::default();
        assert_eq!(validation::resolve_category(&expense("x", "1"), &settings), "Despesa");
        assert_eq!(
            validation::resolve_category(&EntryInput::new("x", "1", EntryType::Income), &settings),
            "Receita"
        );
        assert_eq!(
            validation::resolve_category(&expense("x", "1").with_category(" Lazer "), &settings),
            "Lazer"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// Amount formatting
// ═══════════════════════════════════════════════════════════════════

mod amount_format {
    use super::*;

    #[test]
    fn masked_input_examples() {
        let pt = LocaleSettings::default();
        assert_eq!(normalize_masked_amount("850000", &pt), "8.500,00");
        assert_eq!(normalize_masked_amount("1", &pt), "0,01");
        assert_eq!(normalize_masked_amount("R$ 12,34", &pt), "12,34");
        assert_eq!(normalize_masked_amount("0000", &pt), "0,00");
        assert_eq!(normalize_masked_amount("abc", &pt), "");
        assert_eq!(normalize_masked_amount("", &pt), "");
    }

    #[test]
    fn masked_input_is_capped() {
        let pt = LocaleSettings::default();
        let long = "9".repeat(MAX_MASK_DIGITS + 5);
        let capped = normalize_masked_amount(&long, &pt);
        assert_eq!(capped, normalize_masked_amount(&"9".repeat(MAX_MASK_DIGITS), &pt));
        assert!(capped.ends_with(",99"));
    }

    #[test]
    fn masked_output_parses_back() {
        let pt = LocaleSettings::default();
        let shown = normalize_masked_amount("123456789", &pt);
        assert_eq!(shown, "1.234.567,89");
        assert_eq!(parse_amount(&shown, &pt), Ok(dec("1234567.89")));
    }

    #[test]
    fn format_amount_groups_and_rounds() {
        let pt = LocaleSettings::default();
        assert_eq!(format_amount(dec("0"), &pt), "0,00");
        assert_eq!(format_amount(dec("999.999"), &pt), "1.000,00");
        assert_eq!(format_amount(dec("1234567.8"), &pt), "1.234.567,80");
    }

    #[test]
    fn format_currency_signs() {
        let pt = LocaleSettings::default();
        assert_eq!(format_currency(dec("6300"), &pt), "R$ 6.300,00");
        assert_eq!(format_currency(dec("-12"), &pt), "-R$ 12,00");
        assert_eq!(format_currency(dec("-0.001"), &pt), "R$ 0,00");
    }
}
