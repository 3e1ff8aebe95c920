use tracing::{info, warn};

use crate::entities::{Draft, Record, RecordKind};
use crate::error::StoreError;
use crate::metrics;

/// Newest-first, in-memory collection of one kind of record.
///
/// A store belongs to exactly one screen controller and is dropped with it.
#[derive(Clone, Debug)]
pub struct RecordStore<T: RecordKind> {
    records: Vec<Record<T>>,
}

impl<T: RecordKind> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RecordKind> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Commits a validated draft and returns the new records.
    ///
    /// Fan-out kinds get one record per selected pet, in selection order,
    /// each with its own id. Other kinds get a single record carrying every
    /// selected pet. The batch goes in front of the existing records.
    pub fn create(&mut self, draft: &Draft<T>) -> Vec<Record<T>> {
        let created: Vec<Record<T>> = if T::FAN_OUT {
            draft
                .pet_ids
                .iter()
                .map(|pet_id| Record::from_draft(vec![pet_id.clone()], draft))
                .collect()
        } else {
            vec![Record::from_draft(draft.pet_ids.clone(), draft)]
        };

        self.records.splice(0..0, created.iter().cloned());

        info!(
            kind = T::LABEL,
            count = created.len(),
            total = self.records.len(),
            "records created"
        );
        metrics::increment_records_created(T::LABEL, created.len());
        metrics::set_record_count(T::LABEL, self.records.len());

        created
    }

    /// Replaces every mutable field of `id` with the draft's values.
    ///
    /// Editing never fans out: the record keeps only the first selected pet.
    pub fn update(&mut self, id: &str, draft: &Draft<T>) -> Result<Record<T>, StoreError> {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            warn!(kind = T::LABEL, id, "update of unknown record");
            return Err(StoreError::NotFound(id.to_string()));
        };

        record.pet_ids = draft.pet_ids.iter().take(1).cloned().collect();
        record.date = draft.date;
        record.details = draft.details.clone();
        record.notes = draft.notes.clone();

        info!(kind = T::LABEL, id, "record updated");
        metrics::increment_records_updated(T::LABEL);

        Ok(record.clone())
    }

    /// Removes `id`. Returns whether anything was removed; deleting an
    /// absent id is a no-op.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;

        if removed {
            info!(kind = T::LABEL, id, "record deleted");
            metrics::increment_records_deleted(T::LABEL);
            metrics::set_record_count(T::LABEL, self.records.len());
        }
        removed
    }

    pub fn all(&self) -> &[Record<T>] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Record<T>> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
