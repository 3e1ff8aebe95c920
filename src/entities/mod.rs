pub mod activity;
pub mod health;
pub mod meal;
pub mod pet;
pub mod record;

pub use activity::{Activity, ActivityRecord};
pub use health::{Health, HealthRecord};
pub use meal::{Meal, MealRecord};
pub use pet::{Pet, PetDraft, Roster, RosterEntry};
pub use record::{Draft, Record, RecordKind};
