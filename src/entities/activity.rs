use serde::{Deserialize, Serialize};

use super::record::{is_blank, Record, RecordKind};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Activity {
    /// Walk, play, training, ...
    #[serde(rename = "activity_type")]
    pub kind: String,
    pub duration: String,
}

impl Activity {
    pub fn new(kind: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            duration: duration.into(),
        }
    }
}

impl RecordKind for Activity {
    const LABEL: &'static str = "activity";
    const TITLE: &'static str = "Activity log";
    const FAN_OUT: bool = true;
    const REJECTS_FUTURE_DATES: bool = true;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.kind) {
            missing.push("activity_type");
        }
        if is_blank(&self.duration) {
            missing.push("duration");
        }
        missing
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.kind]
    }
}

pub type ActivityRecord = Record<Activity>;
