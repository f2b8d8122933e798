use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::LedgerError;
use crate::models::entry::{Entry, EntryId, EntryInput, EntryType};
use crate::models::settings::LedgerSettings;

use super::validation::{ValidInput, Validator};

/// Create / update / delete on the in-memory entry sequence.
///
/// Pure business logic — no I/O, no clock except the `now` passed in.
/// The sequence is kept newest-first: new entries go to the front.
#[derive(Debug, Clone, Default)]
pub struct LedgerService {
    validator: Validator,
}

impl LedgerService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(validator: Validator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate `input` and prepend a new entry created at `now`.
    /// On error the sequence is left untouched.
    pub fn add(
        &self,
        entries: &mut Vec<Entry>,
        input: &EntryInput,
        settings: &LedgerSettings,
        now: DateTime<Utc>,
    ) -> Result<Entry, LedgerError> {
        let valid = self.validator.validate(input, settings)?;

        let entry = Self::build(Self::fresh_id(entries), now, valid);
        debug!(id = %entry.id, amount = %entry.amount, "adding entry");
        entries.insert(0, entry.clone());
        Ok(entry)
    }

    /// Overwrite an existing entry in place, keeping its `id`, `created_at`
    /// and position in the sequence.
    pub fn update(
        &self,
        entries: &mut [Entry],
        id: &EntryId,
        input: &EntryInput,
        settings: &LedgerSettings,
    ) -> Result<Entry, LedgerError> {
        let valid = self.validator.validate(input, settings)?;

        let slot = entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))?;

        *slot = Self::build(slot.id.clone(), slot.created_at, valid);
        debug!(id = %slot.id, "updated entry");
        Ok(slot.clone())
    }

    /// Remove by id. Removing an unknown id is not an error.
    pub fn remove(&self, entries: &mut Vec<Entry>, id: &EntryId) -> Option<Entry> {
        let idx = entries.iter().position(|e| &e.id == id)?;
        let removed = entries.remove(idx);
        debug!(id = %removed.id, "removed entry");
        Some(removed)
    }

    /// Entries of a given type, newest-first.
    pub fn get_entries_by_type<'a>(&self, entries: &'a [Entry], entry_type: EntryType) -> Vec<&'a Entry> {
        entries.iter().filter(|e| e.entry_type == entry_type).collect()
    }

    /// Case-insensitive substring search on description and category.
    pub fn search<'a>(&self, entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return entries.iter().collect();
        }
        entries
            .iter()
            .filter(|e| {
                e.description.to_lowercase().contains(&needle)
                    || e.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// A time-ordered id that no current entry already uses.
    fn fresh_id(entries: &[Entry]) -> EntryId {
        loop {
            let id = EntryId::generate();
            if entries.iter().all(|e| e.id != id) {
                return id;
            }
        }
    }

    fn build(id: EntryId, created_at: DateTime<Utc>, valid: ValidInput) -> Entry {
        Entry {
            id,
            description: valid.description,
            amount: valid.amount,
            entry_type: valid.entry_type,
            category: valid.category,
            subcategory: valid.subcategory,
            payment_method: valid.payment_method,
            created_at,
        }
    }
}
