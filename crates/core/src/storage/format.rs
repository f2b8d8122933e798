use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

use crate::errors::LedgerError;
use crate::models::entry::{Entry, EntryId, EntryType};
use crate::models::settings::LedgerSettings;

/// Current blob format version.
///
/// Layout:
/// ```text
/// {"version": 1, "entries": [ {"id": .., "description": .., "amount": .., "type": ..,
///                              "category": .., "createdAt": ..}, ... ]}
/// ```
/// A bare JSON array of entries (older app versions) is read as version 0.
pub const CURRENT_VERSION: u16 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u16,
    entries: &'a [Entry],
}

/// Why a stored record was dropped while loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejection {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing or invalid id")]
    MissingId,
    #[error("missing description")]
    MissingDescription,
    #[error("amount is not numeric")]
    InvalidAmount,
    #[error("amount is not positive")]
    NonPositiveAmount,
    #[error("type is neither income nor expense")]
    InvalidType,
    #[error("missing or invalid createdAt")]
    InvalidTimestamp,
}

/// A dropped record and its position in the stored array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: RecordRejection,
}

/// Outcome of decoding a blob: the accepted entries (stored order) and
/// the records that failed shape validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub version: u16,
    pub entries: Vec<Entry>,
    pub rejected: Vec<RejectedRecord>,
}

/// Serialize the whole collection into the current envelope.
pub fn write_entries(entries: &[Entry]) -> Result<String, LedgerError> {
    serde_json::to_string(&Envelope {
        version: CURRENT_VERSION,
        entries,
    })
    .map_err(|e| LedgerError::Serialization(format!("Failed to serialize entries: {e}")))
}

/// Parse a stored blob. Structural problems (not JSON, unknown envelope,
/// future version) fail the whole read; bad individual records are
/// reported in [`LoadReport::rejected`] instead.
pub fn read_entries(raw: &str, settings: &LedgerSettings) -> Result<LoadReport, LedgerError> {
    let value: Value = serde_json::from_str(raw)?;

    let (version, records) = match value {
        Value::Array(records) => (0, records),
        Value::Object(mut obj) => {
            let version = obj
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| LedgerError::InvalidFormat("missing envelope version".into()))?;
            let version = u16::try_from(version)
                .map_err(|_| LedgerError::InvalidFormat(format!("version {version} out of range")))?;
            if version == 0 || version > CURRENT_VERSION {
                return Err(LedgerError::UnsupportedVersion(version));
            }
            match obj.remove("entries") {
                Some(Value::Array(records)) => (version, records),
                _ => {
                    return Err(LedgerError::InvalidFormat(
                        "envelope has no entries array".into(),
                    ))
                }
            }
        }
        other => {
            return Err(LedgerError::InvalidFormat(format!(
                "expected an array or an envelope object, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut report = LoadReport {
        version,
        ..LoadReport::default()
    };
    for (index, record) in records.iter().enumerate() {
        match validate_record(record, settings) {
            Ok(entry) => report.entries.push(entry),
            Err(reason) => report.rejected.push(RejectedRecord { index, reason }),
        }
    }
    Ok(report)
}

/// Shape-check one stored record and turn it into an [`Entry`].
///
/// Accepts the field spellings of every app generation: `createdAt`,
/// `created_at` or `date`; numeric or string ids; numeric or numeric-string
/// amounts; `YYYY-MM-DD` or RFC 3339 timestamps.
pub fn validate_record(record: &Value, settings: &LedgerSettings) -> Result<Entry, RecordRejection> {
    let obj = record.as_object().ok_or(RecordRejection::NotAnObject)?;

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => EntryId::from(s.trim()),
        Some(Value::Number(n)) => EntryId::from(n.to_string()),
        _ => return Err(RecordRejection::MissingId),
    };

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(RecordRejection::MissingDescription)?
        .to_string();

    let amount = obj
        .get("amount")
        .and_then(decimal_from_json)
        .ok_or(RecordRejection::InvalidAmount)?;
    if amount <= Decimal::ZERO {
        return Err(RecordRejection::NonPositiveAmount);
    }

    let entry_type = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(EntryType::parse)
        .ok_or(RecordRejection::InvalidType)?;

    let created_at = ["createdAt", "created_at", "date"]
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .ok_or(RecordRejection::InvalidTimestamp)?;

    let category = optional_text(obj, "category")
        .unwrap_or_else(|| settings.fallback_category(entry_type).to_string());

    Ok(Entry {
        id,
        description,
        amount,
        entry_type,
        category,
        subcategory: optional_text(obj, "subcategory"),
        payment_method: optional_text(obj, "paymentMethod")
            .or_else(|| optional_text(obj, "payment_method")),
        created_at,
    })
}

fn optional_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    // numbers keep their source text, so `120.50` reads back as exactly 120.50
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
