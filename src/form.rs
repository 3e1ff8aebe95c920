use chrono::NaiveDateTime;
use tracing::warn;

use crate::entities::{Draft, Record, RecordKind, Roster};
use crate::error::{FormError, ValidationError};
use crate::metrics;
use crate::store::RecordStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormState {
    /// Defaults only, nothing typed yet.
    Empty,
    /// Fields touched. `record_id` is set when editing an existing record.
    Editing { record_id: Option<String> },
}

/// What a successful submit did to the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Submitted<T> {
    Created(Vec<Record<T>>),
    Updated(Record<T>),
}

impl<T> Submitted<T> {
    pub fn records(&self) -> Vec<&Record<T>> {
        match self {
            Submitted::Created(records) => records.iter().collect(),
            Submitted::Updated(record) => vec![record],
        }
    }
}

/// Edit buffer behind the add/edit modal of a record screen.
#[derive(Clone, Debug)]
pub struct FormSession<T: RecordKind> {
    draft: Draft<T>,
    state: FormState,
}

impl<T: RecordKind> FormSession<T> {
    /// Clean slate: blank fields, no pets, date defaulting to `now`.
    pub fn start(now: NaiveDateTime) -> Self {
        Self {
            draft: Draft::new(now),
            state: FormState::Empty,
        }
    }

    /// Pre-filled from an existing record. Edits always target a single pet.
    pub fn seed_from_record(record: &Record<T>) -> Self {
        let mut draft = Draft::from(record);
        draft.pet_ids = record.first_pet().map(str::to_string).into_iter().collect();
        Self {
            draft,
            state: FormState::Editing {
                record_id: Some(record.id.clone()),
            },
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn draft(&self) -> &Draft<T> {
        &self.draft
    }

    /// Id of the record being edited, if any.
    pub fn editing(&self) -> Option<&str> {
        match &self.state {
            FormState::Editing {
                record_id: Some(id),
            } => Some(id),
            _ => None,
        }
    }

    fn touch(&mut self) {
        if self.state == FormState::Empty {
            self.state = FormState::Editing { record_id: None };
        }
    }

    pub fn toggle_pet(&mut self, pet_id: &str) {
        self.touch();
        if let Some(pos) = self.draft.pet_ids.iter().position(|id| id == pet_id) {
            self.draft.pet_ids.remove(pos);
        } else {
            self.draft.pet_ids.push(pet_id.to_string());
        }
    }

    /// Selects the whole roster, or clears the selection when it already is
    /// the whole roster. The ids are copied, so later roster changes do not
    /// affect this selection.
    pub fn toggle_all_pets(&mut self, roster: &Roster) {
        self.touch();
        let all_selected = self.draft.pet_ids.len() == roster.len()
            && roster.entries().iter().all(|e| self.draft.pet_ids.contains(&e.id));
        if all_selected {
            self.draft.pet_ids.clear();
        } else {
            self.draft.pet_ids = roster.ids();
        }
    }

    pub fn set_date(&mut self, date: NaiveDateTime) {
        self.touch();
        self.draft.date = date;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.touch();
        self.draft.notes = notes.into();
    }

    pub fn details_mut(&mut self) -> &mut T {
        self.touch();
        &mut self.draft.details
    }

    /// Replaces the whole buffer, keeping the edit target.
    pub fn fill(&mut self, draft: Draft<T>) {
        self.touch();
        self.draft = draft;
    }

    pub fn validate(&self, now: NaiveDateTime) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.draft.pet_ids.is_empty() {
            missing.push("pet_ids");
        }
        missing.extend(self.draft.details.missing_fields());
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        if T::REJECTS_FUTURE_DATES && self.draft.date > now {
            return Err(ValidationError::FutureDate);
        }
        Ok(())
    }

    /// Pets in the selection that the roster does not know.
    pub fn validate_pets(&self, roster: &Roster) -> Result<(), ValidationError> {
        let unknown: Vec<String> = self
            .draft
            .pet_ids
            .iter()
            .filter(|id| !roster.contains(id.as_str()))
            .cloned()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::UnknownPets(unknown))
        }
    }

    /// Validates and commits the buffer. On failure the store is untouched
    /// and the buffer kept; on success the session is back to a clean slate.
    pub fn submit(
        &mut self,
        store: &mut RecordStore<T>,
        now: NaiveDateTime,
    ) -> Result<Submitted<T>, FormError> {
        if let Err(e) = self.validate(now) {
            warn!(kind = T::LABEL, error = %e, "form rejected");
            metrics::increment_validation_failures(T::LABEL, reason(&e));
            return Err(e.into());
        }

        let submitted = match self.editing() {
            Some(id) => Submitted::Updated(store.update(id, &self.draft)?),
            None => Submitted::Created(store.create(&self.draft)),
        };

        self.reset(now);
        Ok(submitted)
    }

    /// Drops everything typed so far.
    pub fn cancel(&mut self, now: NaiveDateTime) {
        self.reset(now);
    }

    fn reset(&mut self, now: NaiveDateTime) {
        self.draft = Draft::new(now);
        self.state = FormState::Empty;
    }
}

pub(crate) fn reason(error: &ValidationError) -> &'static str {
    match error {
        ValidationError::MissingFields(_) => "missing_fields",
        ValidationError::FutureDate => "future_date",
        ValidationError::UnknownPets(_) => "unknown_pets",
    }
}
