use super::entry::EntryId;

/// Whether saving the form creates a new entry or edits an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    /// No target: saving prepends a new entry
    #[default]
    Create,
    /// Saving overwrites the entry with this id
    Edit(EntryId),
}

impl FormMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    pub fn target(&self) -> Option<&EntryId> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}
