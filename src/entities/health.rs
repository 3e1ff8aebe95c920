use serde::{Deserialize, Serialize};

use super::record::{is_blank, Record, RecordKind};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Health {
    /// Checkup, vaccination, surgery, ...
    pub visit_type: String,
    /// Vet or clinic the visit took place at.
    pub vet: String,
}

impl Health {
    pub fn new(visit_type: impl Into<String>, vet: impl Into<String>) -> Self {
        Self {
            visit_type: visit_type.into(),
            vet: vet.into(),
        }
    }
}

impl RecordKind for Health {
    const LABEL: &'static str = "health";
    const TITLE: &'static str = "Health record";
    // One visit can cover several pets; it stays a single shared record.
    const FAN_OUT: bool = false;
    const REJECTS_FUTURE_DATES: bool = false;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.visit_type) {
            missing.push("visit_type");
        }
        if is_blank(&self.vet) {
            missing.push("vet");
        }
        missing
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.visit_type]
    }
}

pub type HealthRecord = Record<Health>;
