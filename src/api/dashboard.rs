use chrono::NaiveDateTime;
use serde::Serialize;

use crate::entities::{ActivityRecord, HealthRecord, Roster};

/// One pet card on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetSummary {
    pub pet_id: String,
    pub name: String,
    pub last_activity: Option<ActivityRecord>,
}

/// Latest activity (by logged date, not by entry order) for every pet on
/// the roster, in roster order.
pub fn last_activity_by_pet(roster: &Roster, activities: &[ActivityRecord]) -> Vec<PetSummary> {
    roster
        .entries()
        .iter()
        .map(|entry| PetSummary {
            pet_id: entry.id.clone(),
            name: entry.name.clone(),
            last_activity: activities
                .iter()
                .filter(|a| a.has_pet(&entry.id))
                .max_by_key(|a| a.date)
                .cloned(),
        })
        .collect()
}

/// Upcoming vet visit shown under the pet cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitReminder {
    pub text: String,
    pub visit: HealthRecord,
}

impl VisitReminder {
    fn new(visit: &HealthRecord) -> Self {
        Self {
            text: format!(
                "Next: {} - {}",
                visit.details.visit_type,
                visit.date.format("%B %-d")
            ),
            visit: visit.clone(),
        }
    }
}

/// Earliest health record dated after `now`, for one pet or, with `None`,
/// across all pets.
pub fn next_health_visit(
    health: &[HealthRecord],
    pet_id: Option<&str>,
    now: NaiveDateTime,
) -> Option<VisitReminder> {
    health
        .iter()
        .filter(|h| h.date > now)
        .filter(|h| pet_id.map_or(true, |id| h.has_pet(id)))
        .min_by_key(|h| h.date)
        .map(VisitReminder::new)
}
