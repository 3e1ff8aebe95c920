use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

/// Per-type descriptor for a loggable record (activity, meal, health visit).
///
/// The store, filters and form sessions are generic over this trait; each
/// implementation only says which fields are required, which fields the
/// search box looks at, and whether a multi-pet entry fans out into one
/// record per pet.
pub trait RecordKind: Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned {
    /// Short machine label used in logs and metric labels.
    const LABEL: &'static str;
    /// Human title used in notifications ("Activity log", "Meal", ...).
    const TITLE: &'static str;
    /// Create one record per selected pet instead of one shared record.
    const FAN_OUT: bool;
    /// Reject dates later than "now" on submit.
    const REJECTS_FUTURE_DATES: bool;

    /// Names of required detail fields that are currently blank.
    fn missing_fields(&self) -> Vec<&'static str>;

    /// Detail fields matched by free-text search, in addition to notes.
    fn search_fields(&self) -> Vec<&str>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: String,
    pub pet_ids: Vec<String>,
    pub date: NaiveDateTime,
    #[serde(flatten)]
    pub details: T,
    #[serde(default)]
    pub notes: String,
}

impl<T: RecordKind> Record<T> {
    pub(crate) fn from_draft(pet_ids: Vec<String>, draft: &Draft<T>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            pet_ids,
            date: draft.date,
            details: draft.details.clone(),
            notes: draft.notes.clone(),
        }
    }

    pub fn has_pet(&self, pet_id: &str) -> bool {
        self.pet_ids.iter().any(|id| id == pet_id)
    }

    pub fn first_pet(&self) -> Option<&str> {
        self.pet_ids.first().map(String::as_str)
    }
}

/// Field values of a record that has not been committed yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Draft<T> {
    #[serde(default)]
    pub pet_ids: Vec<String>,
    pub date: NaiveDateTime,
    #[serde(flatten)]
    pub details: T,
    #[serde(default)]
    pub notes: String,
}

impl<T: RecordKind> Draft<T> {
    pub fn new(date: NaiveDateTime) -> Self {
        Self {
            pet_ids: Vec::new(),
            date,
            details: T::default(),
            notes: String::new(),
        }
    }
}

impl<T: RecordKind> From<&Record<T>> for Draft<T> {
    fn from(record: &Record<T>) -> Self {
        Self {
            pet_ids: record.pet_ids.clone(),
            date: record.date,
            details: record.details.clone(),
            notes: record.notes.clone(),
        }
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
