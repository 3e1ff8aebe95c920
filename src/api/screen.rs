use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::entities::{Record, RecordKind, Roster};
use crate::error::{FormError, StoreError};
use crate::filter::{DateFilter, Filters, PetFilter};
use crate::form::{reason, FormSession, Submitted};
use crate::metrics;
use crate::notifications::{NotificationTemplates, Notifier};
use crate::store::RecordStore;

/// Controller behind one record list screen (activities, meals or health
/// records): the store, the open modal form, the list filters and the
/// roster snapshot taken at mount time.
pub struct RecordScreen<T: RecordKind> {
    store: RecordStore<T>,
    form: Option<FormSession<T>>,
    filters: Filters,
    roster: Roster,
    notifier: Box<dyn Notifier>,
}

impl<T: RecordKind> RecordScreen<T> {
    pub fn new(roster: Roster, notifier: Box<dyn Notifier>) -> Self {
        Self {
            store: RecordStore::new(),
            form: None,
            filters: Filters::default(),
            roster,
            notifier,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Swaps in a fresh roster. Existing records keep their pet ids.
    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = roster;
    }

    pub fn records(&self) -> &[Record<T>] {
        self.store.all()
    }

    pub fn store(&self) -> &RecordStore<T> {
        &self.store
    }

    /// Opens the modal on a clean slate, discarding any open form.
    pub fn open_new(&mut self, now: NaiveDateTime) -> &mut FormSession<T> {
        self.form.insert(FormSession::start(now))
    }

    pub fn open_edit(&mut self, id: &str) -> Result<&mut FormSession<T>, StoreError> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let session = FormSession::seed_from_record(record);
        Ok(self.form.insert(session))
    }

    pub fn form(&self) -> Option<&FormSession<T>> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormSession<T>> {
        self.form.as_mut()
    }

    pub fn toggle_pet(&mut self, pet_id: &str) -> Result<(), FormError> {
        let form = self.form.as_mut().ok_or(FormError::NoActiveForm)?;
        form.toggle_pet(pet_id);
        Ok(())
    }

    pub fn toggle_all_pets(&mut self) -> Result<(), FormError> {
        let form = self.form.as_mut().ok_or(FormError::NoActiveForm)?;
        form.toggle_all_pets(&self.roster);
        Ok(())
    }

    /// Submits the open form. The modal closes on success and stays open
    /// with its buffer on failure.
    pub fn save(&mut self, now: NaiveDateTime) -> Result<Submitted<T>, FormError> {
        let form = self.form.as_mut().ok_or(FormError::NoActiveForm)?;

        if let Err(e) = form.validate_pets(&self.roster) {
            warn!(kind = T::LABEL, error = %e, "form references unknown pets");
            metrics::increment_validation_failures(T::LABEL, reason(&e));
            self.notifier.notify(NotificationTemplates::form_rejected(&e));
            return Err(e.into());
        }

        match form.submit(&mut self.store, now) {
            Ok(submitted) => {
                let notice = match &submitted {
                    Submitted::Created(records) => {
                        NotificationTemplates::records_created::<T>(records.len())
                    }
                    Submitted::Updated(_) => NotificationTemplates::record_updated::<T>(),
                };
                self.notifier.notify(notice);
                self.form = None;
                Ok(submitted)
            }
            Err(e) => {
                if let FormError::Validation(v) = &e {
                    self.notifier.notify(NotificationTemplates::form_rejected(v));
                }
                Err(e)
            }
        }
    }

    /// Closes the modal and drops whatever was typed.
    pub fn cancel(&mut self) {
        if self.form.take().is_some() {
            info!(kind = T::LABEL, "form cancelled");
        }
    }

    /// Deletes after the user confirmed. Unknown ids are ignored.
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.store.delete(id);
        if removed {
            self.notifier.notify(NotificationTemplates::record_deleted::<T>());
        }
        removed
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn set_pet_filter(&mut self, filter: PetFilter) {
        self.filters.pet = filter;
    }

    pub fn set_date_filter(&mut self, filter: DateFilter) {
        self.filters.date = filter;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    /// The list as it should render right now.
    pub fn visible(&self, now: NaiveDateTime) -> Vec<&Record<T>> {
        self.filters.apply(self.store.all(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Activity, Health, Meal};
    use crate::error::ValidationError;
    use crate::notifications::{Level, RecordingNotifier};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 4)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap()
    }

    fn screen<T: RecordKind>() -> (RecordScreen<T>, RecordingNotifier) {
        let notices = RecordingNotifier::new();
        (
            RecordScreen::new(Roster::seed(), Box::new(notices.clone())),
            notices,
        )
    }

    #[test]
    fn save_without_open_form_fails() {
        let (mut screen, _) = screen::<Meal>();
        assert_eq!(screen.save(now()), Err(FormError::NoActiveForm));
    }

    #[test]
    fn all_pets_fan_out_and_notify() {
        let (mut screen, notices) = screen::<Activity>();
        screen.open_new(now());
        screen.toggle_all_pets().unwrap();
        *screen.form_mut().unwrap().details_mut() = Activity::new("Walk", "1h");

        let submitted = screen.save(now()).unwrap();
        assert_eq!(submitted.records().len(), 3);
        assert!(screen.form().is_none());
        assert_eq!(
            notices.last().map(|n| n.title),
            Some("Activity logs added for 3 pets!".to_string())
        );
    }

    #[test]
    fn rejected_save_keeps_modal_open() {
        let (mut screen, notices) = screen::<Health>();
        screen.open_new(now());
        screen.toggle_pet("2").unwrap();

        let err = screen.save(now()).unwrap_err();
        assert_eq!(
            err,
            FormError::Validation(ValidationError::MissingFields(vec!["visit_type", "vet"]))
        );
        assert!(screen.form().is_some());
        assert!(screen.records().is_empty());
        assert_eq!(notices.last().map(|n| n.level), Some(Level::Error));
    }

    #[test]
    fn unknown_pet_is_rejected_before_submit() {
        let (mut screen, _) = screen::<Meal>();
        screen.open_new(now());
        screen.toggle_pet("77").unwrap();
        *screen.form_mut().unwrap().details_mut() = Meal::new("", "Kibble", "1", "cup");

        assert_eq!(
            screen.save(now()),
            Err(FormError::Validation(ValidationError::UnknownPets(vec![
                "77".into()
            ])))
        );
    }

    #[test]
    fn edit_flow_updates_in_place() {
        let (mut screen, notices) = screen::<Meal>();
        screen.open_new(now());
        screen.toggle_pet("1").unwrap();
        *screen.form_mut().unwrap().details_mut() = Meal::new("Lunch", "Kibble", "80", "g");
        screen.save(now()).unwrap();
        let id = screen.records()[0].id.clone();

        screen.open_edit(&id).unwrap().details_mut().food_type = "Chicken".into();
        screen.save(now()).unwrap();

        assert_eq!(screen.records().len(), 1);
        assert_eq!(screen.records()[0].id, id);
        assert_eq!(screen.records()[0].details.food_type, "Chicken");
        assert_eq!(
            notices.last().map(|n| n.title),
            Some("Meal updated!".to_string())
        );
    }

    #[test]
    fn open_edit_unknown_id() {
        let (mut screen, _) = screen::<Activity>();
        assert!(matches!(
            screen.open_edit("nope"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn cancel_discards_form() {
        let (mut screen, _) = screen::<Activity>();
        screen.open_new(now());
        screen.toggle_pet("1").unwrap();
        screen.cancel();
        assert!(screen.form().is_none());
        assert_eq!(screen.toggle_pet("1"), Err(FormError::NoActiveForm));
    }

    #[test]
    fn visible_follows_filters() {
        let (mut screen, notices) = screen::<Activity>();
        for (pet, kind) in [("1", "Walk"), ("2", "Fetch")] {
            screen.open_new(now());
            screen.toggle_pet(pet).unwrap();
            *screen.form_mut().unwrap().details_mut() = Activity::new(kind, "15 min");
            screen.save(now()).unwrap();
        }

        screen.set_pet_filter(PetFilter::Pet("1".into()));
        screen.set_date_filter(DateFilter::Today);
        let shown = screen.visible(now());
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].details.kind, "Walk");

        screen.set_pet_filter(PetFilter::All);
        screen.set_search("fetch");
        assert_eq!(screen.visible(now()).len(), 1);

        let id = screen.visible(now())[0].id.clone();
        assert!(screen.delete(&id));
        assert!(!screen.delete(&id));
        assert!(screen.visible(now()).is_empty());
        assert_eq!(
            notices.last().map(|n| n.title),
            Some("Activity log deleted!".to_string())
        );
    }
}
