//! Headless driver for the app screens. Each input line is one JSON
//! command; each reply is one JSON object carrying the result and the
//! notices the command raised.

use chrono::NaiveDateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::auth::{self, RegistrationForm};
use crate::api::dashboard::{last_activity_by_pet, next_health_visit};
use crate::api::pet::PetDirectory;
use crate::api::screen::RecordScreen;
use crate::entities::{Activity, Draft, Health, Meal, Pet, PetDraft, RecordKind};
use crate::error::{CredentialErrors, FormError, PetError, StoreError};
use crate::filter::Filters;
use crate::notifications::{LogNotifier, Notice, Notifier, RecordingNotifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Activity,
    Meal,
    Health,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    ListPets {
        #[serde(default)]
        search: String,
    },
    AddPet {
        pet: PetDraft,
    },
    DeletePet {
        id: String,
    },
    /// Create when `id` is absent, edit otherwise.
    Save {
        screen: ScreenKind,
        #[serde(default)]
        id: Option<String>,
        draft: Value,
    },
    Delete {
        screen: ScreenKind,
        id: String,
    },
    List {
        screen: ScreenKind,
        #[serde(default)]
        filters: Filters,
    },
    Login {
        email: String,
        password: String,
    },
    Register {
        form: RegistrationForm,
    },
    ResetPassword {
        email: String,
        new_password: String,
        confirm_password: String,
    },
    Dashboard,
    Metrics,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("malformed command: {0}")]
    BadCommand(#[from] serde_json::Error),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pet(#[from] PetError),

    #[error(transparent)]
    Credentials(#[from] CredentialErrors),

    #[error("metrics exporter is not installed")]
    MetricsUnavailable,
}

/// Form input for a save command. Detail fields sit at the top level next
/// to the shared ones.
#[derive(Debug, Deserialize)]
struct DraftInput<T> {
    #[serde(default)]
    pet_ids: Vec<String>,
    #[serde(default)]
    all_pets: bool,
    #[serde(default)]
    date: Option<NaiveDateTime>,
    #[serde(flatten)]
    details: T,
    #[serde(default)]
    notes: String,
}

/// Every screen of one app run, sharing a single notice buffer.
pub struct Session {
    pets: PetDirectory,
    activities: RecordScreen<Activity>,
    meals: RecordScreen<Meal>,
    health: RecordScreen<Health>,
    known_emails: Vec<String>,
    notices: RecordingNotifier,
    metrics: Option<PrometheusHandle>,
}

impl Session {
    pub fn new(pets: Vec<Pet>, known_emails: Vec<String>, metrics: Option<PrometheusHandle>) -> Self {
        let notices = RecordingNotifier::new();
        let pets = PetDirectory::new(pets, Box::new(notices.clone()));
        let roster = pets.roster();
        Self {
            activities: RecordScreen::new(roster.clone(), Box::new(notices.clone())),
            meals: RecordScreen::new(roster.clone(), Box::new(notices.clone())),
            health: RecordScreen::new(roster, Box::new(notices.clone())),
            pets,
            known_emails,
            notices,
            metrics,
        }
    }

    pub fn activities(&self) -> &RecordScreen<Activity> {
        &self.activities
    }

    pub fn meals(&self) -> &RecordScreen<Meal> {
        &self.meals
    }

    pub fn health(&self) -> &RecordScreen<Health> {
        &self.health
    }

    pub fn pets(&self) -> &PetDirectory {
        &self.pets
    }

    /// Runs one command line and renders the reply line.
    pub fn handle_line(&mut self, line: &str, now: NaiveDateTime) -> String {
        let outcome = serde_json::from_str::<Command>(line)
            .map_err(SessionError::from)
            .and_then(|command| self.dispatch(command, now));
        let notices: Vec<Notice> = self.notices.drain();
        for notice in &notices {
            LogNotifier.notify(notice.clone());
        }

        let reply = match outcome {
            Ok(data) => json!({ "ok": true, "data": data, "notices": notices }),
            Err(e) => {
                warn!(error = %e, "command failed");
                let mut reply = json!({ "ok": false, "error": e.to_string(), "notices": notices });
                if let SessionError::Credentials(errors) = &e {
                    reply["fields"] = json!(errors);
                }
                reply
            }
        };
        reply.to_string()
    }

    pub fn dispatch(&mut self, command: Command, now: NaiveDateTime) -> Result<Value, SessionError> {
        match command {
            Command::ListPets { search } => Ok(json!({ "pets": self.pets.search(&search) })),
            Command::AddPet { pet } => {
                let pet = self.pets.add(&pet)?;
                self.refresh_rosters();
                Ok(json!({ "pet": pet }))
            }
            Command::DeletePet { id } => {
                let removed = self.pets.delete(&id);
                self.refresh_rosters();
                Ok(json!({ "removed": removed }))
            }
            Command::Save { screen, id, draft } => match screen {
                ScreenKind::Activity => save(&mut self.activities, id, draft, now),
                ScreenKind::Meal => save(&mut self.meals, id, draft, now),
                ScreenKind::Health => save(&mut self.health, id, draft, now),
            },
            Command::Delete { screen, id } => {
                let removed = match screen {
                    ScreenKind::Activity => self.activities.delete(&id),
                    ScreenKind::Meal => self.meals.delete(&id),
                    ScreenKind::Health => self.health.delete(&id),
                };
                Ok(json!({ "removed": removed }))
            }
            Command::List { screen, filters } => match screen {
                ScreenKind::Activity => list(&mut self.activities, filters, now),
                ScreenKind::Meal => list(&mut self.meals, filters, now),
                ScreenKind::Health => list(&mut self.health, filters, now),
            },
            Command::Login { email, password } => {
                auth::validate_login(&email, &password)?;
                info!("login accepted");
                self.notices.notify(Notice::success("Login Successful!"));
                Ok(json!({ "navigate": "dashboard" }))
            }
            Command::Register { form } => {
                auth::validate_registration(&form, &self.known_emails)?;
                info!("registration accepted");
                self.notices.notify(Notice::success(
                    "Registration Successful! Your account has been created.",
                ));
                Ok(json!({ "navigate": "login" }))
            }
            Command::ResetPassword {
                email,
                new_password,
                confirm_password,
            } => {
                auth::validate_password_reset(&email, &new_password, &confirm_password)?;
                self.notices.notify(Notice::success("Password reset successful!"));
                Ok(json!({ "navigate": "login" }))
            }
            Command::Dashboard => {
                let summary = last_activity_by_pet(&self.pets.roster(), self.activities.records());
                let next_visit = next_health_visit(self.health.records(), None, now);
                Ok(json!({ "pets": summary, "next_visit": next_visit }))
            }
            Command::Metrics => {
                let handle = self.metrics.as_ref().ok_or(SessionError::MetricsUnavailable)?;
                Ok(json!({ "metrics": handle.render() }))
            }
        }
    }

    fn refresh_rosters(&mut self) {
        let roster = self.pets.roster();
        self.activities.set_roster(roster.clone());
        self.meals.set_roster(roster.clone());
        self.health.set_roster(roster);
    }
}

fn save<T: RecordKind>(
    screen: &mut RecordScreen<T>,
    id: Option<String>,
    draft: Value,
    now: NaiveDateTime,
) -> Result<Value, SessionError> {
    let input: DraftInput<T> = serde_json::from_value(draft)?;
    let pet_ids = if input.all_pets {
        screen.roster().ids()
    } else {
        input.pet_ids
    };

    let form = match id.as_deref() {
        Some(id) => screen.open_edit(id)?,
        None => screen.open_new(now),
    };
    let date = input.date.unwrap_or(form.draft().date);
    form.fill(Draft {
        pet_ids,
        date,
        details: input.details,
        notes: input.notes,
    });

    match screen.save(now) {
        Ok(submitted) => Ok(json!({ "records": submitted.records() })),
        Err(e) => {
            // Every save command carries the full form, so nothing is left
            // open for the next one.
            screen.cancel();
            Err(e.into())
        }
    }
}

fn list<T: RecordKind>(
    screen: &mut RecordScreen<T>,
    filters: Filters,
    now: NaiveDateTime,
) -> Result<Value, SessionError> {
    screen.set_filters(filters);
    Ok(json!({
        "filters": screen.filters(),
        "records": screen.visible(now),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pet::seed_pets;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 10)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap()
    }

    fn session() -> Session {
        Session::new(seed_pets(), vec!["test@example.com".into()], None)
    }

    fn run(session: &mut Session, line: &str) -> Value {
        serde_json::from_str(&session.handle_line(line, now())).unwrap()
    }

    #[test]
    fn save_and_list_meals() {
        let mut s = session();
        let reply = run(
            &mut s,
            r#"{"command":"save","screen":"meal","draft":{"pet_ids":["1","2"],"meal_type":"Breakfast","food_type":"Kibble","quantity_number":"50","quantity_unit":"g"}}"#,
        );
        assert_eq!(reply["ok"], true);
        assert_eq!(reply["data"]["records"].as_array().unwrap().len(), 2);
        assert_eq!(reply["notices"][0]["title"], "Meals added for 2 pets!");

        let reply = run(
            &mut s,
            r#"{"command":"list","screen":"meal","filters":{"pet":"2","date":"Today","search":"kib"}}"#,
        );
        let records = reply["data"]["records"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["pet_ids"][0], "2");
        assert_eq!(reply["data"]["filters"]["date"], "Today");
    }

    #[test]
    fn failed_save_reports_missing_fields() {
        let mut s = session();
        let reply = run(
            &mut s,
            r#"{"command":"save","screen":"health","draft":{"all_pets":true,"visit_type":"Checkup"}}"#,
        );
        assert_eq!(reply["ok"], false);
        assert_eq!(reply["error"], "missing required fields: vet");
        assert_eq!(reply["notices"][0]["level"], "error");
        assert!(s.health().records().is_empty());
        assert!(s.health().form().is_none());
    }

    #[test]
    fn edit_unknown_record_is_not_found() {
        let mut s = session();
        let reply = run(
            &mut s,
            r#"{"command":"save","screen":"activity","id":"ghost","draft":{"pet_ids":["1"],"activity_type":"Walk","duration":"5 min"}}"#,
        );
        assert_eq!(reply["ok"], false);
        assert_eq!(reply["error"], "record not found: ghost");
    }

    #[test]
    fn new_pets_become_selectable() {
        let mut s = session();
        let reply = run(
            &mut s,
            r#"{"command":"add_pet","pet":{"name":"Luna","species":"Cat","breed":"Siamese","gender":"Female","birthday":"2021-04-02","weight":"4"}}"#,
        );
        let luna = reply["data"]["pet"]["id"].as_str().unwrap().to_string();

        let line = format!(
            r#"{{"command":"save","screen":"activity","draft":{{"pet_ids":["{luna}"],"activity_type":"Nap","duration":"2h"}}}}"#
        );
        assert_eq!(run(&mut s, &line)["ok"], true);
        assert_eq!(s.activities().roster().len(), 4);
    }

    #[test]
    fn registration_errors_are_per_field() {
        let mut s = session();
        let reply = run(
            &mut s,
            r#"{"command":"register","form":{"user_type":"Owner","first_name":"A","last_name":"B","contact_number":"1","address":"x","email":"test@example.com","password":"abc123!?","confirm_password":"abc123!?"}}"#,
        );
        assert_eq!(reply["ok"], false);
        assert_eq!(reply["fields"]["email"], "This email is already registered.");
    }

    #[test]
    fn dashboard_and_metrics() {
        let mut s = session();
        run(
            &mut s,
            r#"{"command":"save","screen":"activity","draft":{"pet_ids":["3"],"activity_type":"Fetch","duration":"20 min"}}"#,
        );
        let reply = run(&mut s, r#"{"command":"dashboard"}"#);
        assert_eq!(reply["data"]["pets"][2]["last_activity"]["activity_type"], "Fetch");
        assert!(reply["data"]["pets"][0]["last_activity"].is_null());
        assert!(reply["data"]["next_visit"].is_null());

        run(
            &mut s,
            r#"{"command":"save","screen":"health","draft":{"pet_ids":["2"],"date":"2024-08-05T10:00:00","visit_type":"Rabies Shot","vet":"Downtown Vet"}}"#,
        );
        let reply = run(&mut s, r#"{"command":"dashboard"}"#);
        assert_eq!(reply["data"]["next_visit"]["text"], "Next: Rabies Shot - August 5");
        assert_eq!(reply["data"]["next_visit"]["visit"]["pet_ids"][0], "2");

        let reply = run(&mut s, r#"{"command":"metrics"}"#);
        assert_eq!(reply["error"], "metrics exporter is not installed");
    }

    #[test]
    fn garbage_is_a_bad_command() {
        let mut s = session();
        let reply = run(&mut s, "not json");
        assert_eq!(reply["ok"], false);
        assert!(reply["error"].as_str().unwrap().starts_with("malformed command"));
    }
}
