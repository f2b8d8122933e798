pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use errors::LedgerError;
use models::{
    entry::{Entry, EntryId, EntryInput, EntryType},
    form::FormMode,
    month::Month,
    settings::LedgerSettings,
    summary::{CategoryTotal, MonthlySummary},
};
use services::{
    amount_format,
    confirm::Confirmation,
    ledger_service::LedgerService,
    summary_service::SummaryService,
    validation::Validator,
};
use storage::{
    format::{self, RejectedRecord},
    manager::StorageManager,
    persister::Persister,
    store::KeyValueStore,
};

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
    Removed(Entry),
    /// The user said no; nothing changed.
    Declined,
    /// No entry with that id; nothing changed.
    NotFound,
}

/// Main entry point of the core library.
/// Holds the entry sequence, the form mode and the services operating on them.
#[must_use]
pub struct FinanceLedger {
    entries: Vec<Entry>,
    settings: LedgerSettings,
    ledger_service: LedgerService,
    summary_service: SummaryService,
    form: FormMode,
    persister: Option<Persister>,
    /// Records dropped by the shape check during the initial load.
    rejected_on_load: Vec<RejectedRecord>,
    /// Entries removed this session, with their former position (undo support).
    trash: Vec<(usize, Entry)>,
    /// Tracks whether any mutation has occurred since the last flush.
    dirty: bool,
}

impl std::fmt::Debug for FinanceLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceLedger")
            .field("entries", &self.entries.len())
            .field("form", &self.form)
            .field("persistent", &self.persister.is_some())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl FinanceLedger {
    /// A ledger with no persistence at all.
    pub fn in_memory(settings: LedgerSettings) -> Self {
        Self::build(Vec::new(), settings, None, Vec::new())
    }

    /// Load the stored collection, then start the background writer.
    ///
    /// The ledger is only handed out once loading finished (or failed and
    /// fell back to empty), so no save can overwrite data that was not
    /// read yet. Must be called from within a tokio runtime.
    pub async fn open(store: Arc<dyn KeyValueStore>, settings: LedgerSettings) -> Self {
        let manager = StorageManager::new(store, settings.clone());
        let report = manager.load().await;
        let persister = Persister::spawn(manager);
        Self::build(report.entries, settings, Some(persister), report.rejected)
    }

    fn build(
        entries: Vec<Entry>,
        settings: LedgerSettings,
        persister: Option<Persister>,
        rejected_on_load: Vec<RejectedRecord>,
    ) -> Self {
        Self {
            entries,
            settings,
            ledger_service: LedgerService::new(),
            summary_service: SummaryService::new(),
            form: FormMode::Create,
            persister,
            rejected_on_load,
            trash: Vec::new(),
            dirty: false,
        }
    }

    /// Replace the validation rule list.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.ledger_service = LedgerService::with_validator(validator);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    // ── Entry Management ────────────────────────────────────────────

    /// Validate the form values and prepend a new entry.
    pub fn add_entry(&mut self, input: &EntryInput) -> Result<Entry, LedgerError> {
        self.add_entry_at(input, Utc::now())
    }

    /// Same as [`add_entry`](Self::add_entry) with an explicit creation time.
    pub fn add_entry_at(
        &mut self,
        input: &EntryInput,
        created_at: DateTime<Utc>,
    ) -> Result<Entry, LedgerError> {
        let entry = self
            .ledger_service
            .add(&mut self.entries, input, &self.settings, created_at)?;
        self.mark_changed();
        Ok(entry)
    }

    /// Overwrite an existing entry, keeping its id and creation time.
    pub fn update_entry(&mut self, id: &EntryId, input: &EntryInput) -> Result<Entry, LedgerError> {
        let entry = self
            .ledger_service
            .update(&mut self.entries, id, input, &self.settings)?;
        self.mark_changed();
        Ok(entry)
    }

    /// Delete an entry after asking `confirm`. Unknown ids are a no-op and
    /// do not prompt.
    pub fn remove_entry(&mut self, id: &EntryId, confirm: &dyn Confirmation) -> Removal {
        let Some(position) = self.entries.iter().position(|e| &e.id == id) else {
            return Removal::NotFound;
        };

        let prompt = format!("Delete \"{}\"?", self.entries[position].description);
        if !confirm.confirm(&prompt) {
            debug!(%id, "removal declined");
            return Removal::Declined;
        }

        match self.ledger_service.remove(&mut self.entries, id) {
            Some(removed) => {
                if self.form.target() == Some(id) {
                    self.form = FormMode::Create;
                }
                self.trash.push((position, removed.clone()));
                self.mark_changed();
                Removal::Removed(removed)
            }
            None => Removal::NotFound,
        }
    }

    /// Put the most recently removed entry back where it was.
    /// Returns `None` when nothing was removed this session.
    pub fn undo_last_removal(&mut self) -> Option<Entry> {
        let (position, entry) = self.trash.pop()?;
        if self.entries.iter().any(|e| e.id == entry.id) {
            return None;
        }
        let position = position.min(self.entries.len());
        self.entries.insert(position, entry.clone());
        self.mark_changed();
        Some(entry)
    }

    #[must_use]
    pub fn get_trash(&self) -> Vec<&Entry> {
        self.trash.iter().map(|(_, e)| e).collect()
    }

    // ── Form Mode ───────────────────────────────────────────────────

    #[must_use]
    pub fn form_mode(&self) -> &FormMode {
        &self.form
    }

    /// Switch the form to edit `id`, returning the values to pre-fill.
    pub fn begin_edit(&mut self, id: &EntryId) -> Result<EntryInput, LedgerError> {
        let entry = self
            .get_entry(id)
            .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))?;
        let input = EntryInput::from_entry(entry, &self.settings.locale);
        self.form = FormMode::Edit(id.clone());
        Ok(input)
    }

    pub fn cancel_edit(&mut self) {
        self.form = FormMode::Create;
    }

    /// Save the form: creates in create mode, updates in edit mode. On
    /// success the form goes back to create mode; on error it stays put so
    /// the user can fix the input.
    pub fn submit(&mut self, input: &EntryInput) -> Result<Entry, LedgerError> {
        let entry = match self.form.clone() {
            FormMode::Create => self.add_entry(input)?,
            FormMode::Edit(id) => self.update_entry(&id, input)?,
        };
        self.form = FormMode::Create;
        Ok(entry)
    }

    // ── Queries ─────────────────────────────────────────────────────

    #[must_use]
    pub fn get_entry(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// All entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn entries_in_month(&self, month: Month) -> Vec<&Entry> {
        self.summary_service
            .entries_in_month(&self.entries, month, self.settings.utc_offset())
    }

    #[must_use]
    pub fn entries_by_type(&self, entry_type: EntryType) -> Vec<&Entry> {
        self.ledger_service.get_entries_by_type(&self.entries, entry_type)
    }

    /// Case-insensitive search on description and category.
    #[must_use]
    pub fn search_entries(&self, query: &str) -> Vec<&Entry> {
        self.ledger_service.search(&self.entries, query)
    }

    /// Records that were dropped as malformed when the ledger was opened.
    #[must_use]
    pub fn rejected_on_load(&self) -> &[RejectedRecord] {
        &self.rejected_on_load
    }

    // ── Summary ─────────────────────────────────────────────────────

    /// Month containing "now" in the configured offset.
    #[must_use]
    pub fn current_month(&self) -> Month {
        Month::current(self.settings.utc_offset())
    }

    /// Income, expense, balance and average expense for `month`.
    #[must_use]
    pub fn summary(&self, month: Month) -> MonthlySummary {
        self.summary_service
            .aggregate(&self.entries, month, self.settings.utc_offset())
    }

    #[must_use]
    pub fn category_breakdown(&self, month: Month, entry_type: EntryType) -> Vec<CategoryTotal> {
        self.summary_service.category_breakdown(
            &self.entries,
            month,
            self.settings.utc_offset(),
            entry_type,
        )
    }

    // ── Amount Input / Display ──────────────────────────────────────

    /// Masked-input transform for the amount field.
    #[must_use]
    pub fn normalize_amount_input(&self, raw: &str) -> String {
        amount_format::normalize_masked_amount(raw, &self.settings.locale)
    }

    #[must_use]
    pub fn format_currency(&self, amount: Decimal) -> String {
        amount_format::format_currency(amount, &self.settings.locale)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all entries in the storage envelope format.
    pub fn export_entries_to_json(&self) -> Result<String, LedgerError> {
        format::write_entries(&self.entries)
    }

    /// Export all entries as a CSV string.
    /// Columns: id, created_at, type, description, category, subcategory, payment_method, amount
    #[must_use]
    pub fn export_entries_to_csv(&self) -> String {
        let mut csv =
            String::from("id,created_at,type,description,category,subcategory,payment_method,amount\n");
        for entry in &self.entries {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                entry.id,
                entry.created_at.to_rfc3339(),
                entry.entry_type.as_str(),
                csv_field(&entry.description),
                csv_field(&entry.category),
                csv_field(entry.subcategory.as_deref().unwrap_or("")),
                csv_field(entry.payment_method.as_deref().unwrap_or("")),
                entry.amount,
            ));
        }
        csv
    }

    /// Import entries from an exported blob (envelope or bare array).
    /// Malformed records and ids already present are skipped.
    /// Returns the number of entries imported.
    pub fn import_entries_from_json(&mut self, json: &str) -> Result<usize, LedgerError> {
        let report = format::read_entries(json, &self.settings)?;
        let mut seen: HashSet<EntryId> = self.entries.iter().map(|e| e.id.clone()).collect();
        let mut fresh: Vec<Entry> = report
            .entries
            .into_iter()
            .filter(|incoming| seen.insert(incoming.id.clone()))
            .collect();
        fresh.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let count = fresh.len();
        if count > 0 {
            self.entries.splice(0..0, fresh);
            self.mark_changed();
        }
        Ok(count)
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Whether mutations happened since the last [`flush`](Self::flush).
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        self.dirty
    }

    /// Wait until all scheduled saves have been attempted.
    pub async fn flush(&mut self) {
        if let Some(persister) = &self.persister {
            persister.flush().await;
        }
        self.dirty = false;
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
        if let Some(persister) = &self.persister {
            persister.schedule(self.entries.clone());
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
