// ═══════════════════════════════════════════════════════════════════
// Error Tests — ValidationError / LedgerError Display, From impls
// ═══════════════════════════════════════════════════════════════════

use financeapp_core::errors::{LedgerError, ValidationError};

// ── Validation messages ─────────────────────────────────────────────

mod validation_display {
    use super::*;

    #[test]
    fn missing_description() {
        assert_eq!(
            ValidationError::MissingDescription.to_string(),
            "Please enter a description"
        );
    }

    #[test]
    fn missing_amount() {
        assert_eq!(ValidationError::MissingAmount.to_string(), "Please enter an amount");
    }

    #[test]
    fn invalid_amount_echoes_input() {
        let err = ValidationError::InvalidAmount("12,3,4".into());
        assert_eq!(err.to_string(), "Invalid amount: 12,3,4");
    }

    #[test]
    fn non_positive_amount() {
        assert_eq!(
            ValidationError::NonPositiveAmount.to_string(),
            "Amount must be greater than zero"
        );
    }

    #[test]
    fn amount_too_large() {
        assert_eq!(ValidationError::AmountTooLarge.to_string(), "Amount is too large");
    }

    #[test]
    fn catalog_errors() {
        assert_eq!(
            ValidationError::UnknownCategory("Viagem".into()).to_string(),
            "Unknown category: Viagem"
        );
        assert_eq!(
            ValidationError::UnknownSubcategory {
                category: "Moradia".into(),
                subcategory: "Cinema".into(),
            }
            .to_string(),
            "Subcategory 'Cinema' does not belong to category 'Moradia'"
        );
        assert_eq!(
            ValidationError::UnknownPaymentMethod("Cheque".into()).to_string(),
            "Unknown payment method: Cheque"
        );
    }
}

// ── Ledger errors ───────────────────────────────────────────────────

mod ledger_display {
    use super::*;

    #[test]
    fn validation_is_transparent() {
        let err = LedgerError::from(ValidationError::MissingAmount);
        assert_eq!(err.to_string(), "Please enter an amount");
        assert_eq!(err.as_validation(), Some(&ValidationError::MissingAmount));
    }

    #[test]
    fn entry_not_found() {
        let err = LedgerError::EntryNotFound("0190a5c4".into());
        assert_eq!(err.to_string(), "Entry not found: 0190a5c4");
        assert!(err.as_validation().is_none());
    }

    #[test]
    fn storage_variants() {
        assert_eq!(
            LedgerError::Persistence("quota exceeded".into()).to_string(),
            "Persistence failed: quota exceeded"
        );
        assert_eq!(
            LedgerError::InvalidFormat("no entries".into()).to_string(),
            "Invalid storage format: no entries"
        );
        assert_eq!(
            LedgerError::UnsupportedVersion(7).to_string(),
            "Unsupported storage version: 7"
        );
        assert_eq!(
            LedgerError::Serialization("x".into()).to_string(),
            "Serialization error: x"
        );
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        let err: LedgerError = io.into();
        assert!(matches!(&err, LedgerError::FileIO(msg) if msg.contains("read-only volume")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: LedgerError = json_err.into();
        assert!(matches!(err, LedgerError::Deserialization(_)));
        assert!(err.to_string().starts_with("Deserialization error: "));
    }

    #[test]
    fn question_mark_converts_validation() {
        fn check(ok: bool) -> Result<(), LedgerError> {
            if !ok {
                Err(ValidationError::NonPositiveAmount)?;
            }
            Ok(())
        }
        assert!(check(true).is_ok());
        assert!(matches!(
            check(false),
            Err(LedgerError::Validation(ValidationError::NonPositiveAmount))
        ));
    }

    #[test]
    fn errors_are_std_errors() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<LedgerError>();
        assert_error::<ValidationError>();
    }
}
