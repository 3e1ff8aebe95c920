//! Derives the visible subset of a store snapshot from the list filters.
//!
//! Everything here is pure: the same records, filter values and `now`
//! always give the same answer, so screens recompute on every render.

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::{Record, RecordKind};

/// Pet picker value. `"all"` in the UI, otherwise a pet id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PetFilter {
    #[default]
    All,
    Pet(String),
}

impl PetFilter {
    pub fn matches<T: RecordKind>(&self, record: &Record<T>) -> bool {
        match self {
            PetFilter::All => true,
            PetFilter::Pet(pet_id) => record.has_pet(pet_id),
        }
    }
}

impl From<String> for PetFilter {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("all") || value.is_empty() {
            PetFilter::All
        } else {
            PetFilter::Pet(value)
        }
    }
}

impl From<PetFilter> for String {
    fn from(filter: PetFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for PetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PetFilter::All => f.write_str("all"),
            PetFilter::Pet(pet_id) => f.write_str(pet_id),
        }
    }
}

/// Relative date window, evaluated against the caller's "now".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    #[serde(rename = "This Week")]
    ThisWeek,
    #[serde(rename = "This Month")]
    ThisMonth,
    #[serde(rename = "This Year")]
    ThisYear,
}

impl DateFilter {
    /// Picker options in display order.
    pub const OPTIONS: [DateFilter; 5] = [
        DateFilter::All,
        DateFilter::Today,
        DateFilter::ThisWeek,
        DateFilter::ThisMonth,
        DateFilter::ThisYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DateFilter::All => "All",
            DateFilter::Today => "Today",
            DateFilter::ThisWeek => "This Week",
            DateFilter::ThisMonth => "This Month",
            DateFilter::ThisYear => "This Year",
        }
    }

    pub fn matches(self, date: NaiveDateTime, now: NaiveDateTime) -> bool {
        let day = date.date();
        let today = now.date();
        match self {
            DateFilter::All => true,
            DateFilter::Today => day == today,
            DateFilter::ThisWeek => {
                // Weeks start on Sunday.
                let offset = i64::from(today.weekday().num_days_from_sunday());
                let start = today - Duration::days(offset);
                let end = start + Duration::days(6);
                day >= start && day <= end
            }
            DateFilter::ThisMonth => day.year() == today.year() && day.month() == today.month(),
            DateFilter::ThisYear => day.year() == today.year(),
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown date filter: {0:?}")]
pub struct UnknownDateFilter(pub String);

impl FromStr for DateFilter {
    type Err = UnknownDateFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateFilter::OPTIONS
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDateFilter(s.to_string()))
    }
}

/// Case-insensitive substring match on the kind's search fields or notes.
/// A blank term matches everything.
pub fn matches_search<T: RecordKind>(record: &Record<T>, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .details
        .search_fields()
        .into_iter()
        .chain(std::iter::once(record.notes.as_str()))
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records passing all three filters, in store order.
pub fn visible<'a, T: RecordKind>(
    records: &'a [Record<T>],
    pet_filter: &PetFilter,
    date_filter: DateFilter,
    search: &str,
    now: NaiveDateTime,
) -> Vec<&'a Record<T>> {
    records
        .iter()
        .filter(|r| pet_filter.matches(*r))
        .filter(|r| date_filter.matches(r.date, now))
        .filter(|r| matches_search(*r, search))
        .collect()
}

/// Current filter values of one list screen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub pet: PetFilter,
    pub date: DateFilter,
    pub search: String,
}

impl Filters {
    pub fn apply<'a, T: RecordKind>(
        &self,
        records: &'a [Record<T>],
        now: NaiveDateTime,
    ) -> Vec<&'a Record<T>> {
        visible(records, &self.pet, self.date, &self.search, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Activity, Meal};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn activity(id: &str, pet: &str, date: NaiveDateTime, kind: &str, notes: &str) -> Record<Activity> {
        Record {
            id: id.to_string(),
            pet_ids: vec![pet.to_string()],
            date,
            details: Activity::new(kind, "20 min"),
            notes: notes.to_string(),
        }
    }

    // Wednesday
    fn now() -> NaiveDateTime {
        at(2024, 5, 15, 12)
    }

    #[test]
    fn neutral_filters_return_everything_in_order() {
        let records = vec![
            activity("c", "1", at(2020, 1, 1, 0), "Walk", ""),
            activity("b", "2", now(), "Play", ""),
            activity("a", "3", at(2030, 1, 1, 0), "Swim", ""),
        ];
        let shown = visible(&records, &PetFilter::All, DateFilter::All, "", now());
        let ids: Vec<_> = shown.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn today_respects_calendar_day() {
        let now = now();
        assert!(DateFilter::Today.matches(now - Duration::hours(1), now));
        assert!(!DateFilter::Today.matches(now - Duration::hours(25), now));
        assert!(DateFilter::Today.matches(at(2024, 5, 15, 0), now));
        assert!(!DateFilter::Today.matches(at(2024, 5, 16, 0), now));
    }

    #[test]
    fn this_week_runs_sunday_to_saturday() {
        let now = now();
        assert!(DateFilter::ThisWeek.matches(at(2024, 5, 12, 0), now));
        assert!(DateFilter::ThisWeek.matches(at(2024, 5, 18, 23), now));
        assert!(!DateFilter::ThisWeek.matches(at(2024, 5, 11, 23), now));
        assert!(!DateFilter::ThisWeek.matches(at(2024, 5, 19, 0), now));
    }

    #[test]
    fn this_week_on_a_sunday_starts_that_day() {
        let sunday = at(2024, 5, 12, 8);
        assert!(DateFilter::ThisWeek.matches(at(2024, 5, 12, 0), sunday));
        assert!(!DateFilter::ThisWeek.matches(at(2024, 5, 11, 12), sunday));
    }

    #[test]
    fn this_week_spans_month_and_year_boundaries() {
        // Wednesday; the week began on Sunday 2024-12-29.
        let new_year = at(2025, 1, 1, 9);
        assert!(DateFilter::ThisWeek.matches(at(2024, 12, 29, 6), new_year));
        assert!(!DateFilter::ThisWeek.matches(at(2024, 12, 28, 23), new_year));
        assert!(DateFilter::ThisWeek.matches(at(2025, 1, 4, 23), new_year));
        assert!(!DateFilter::ThisYear.matches(at(2024, 12, 29, 6), new_year));

        // Saturday; the week began on Sunday 2024-05-26.
        let june_first = at(2024, 6, 1, 9);
        assert!(DateFilter::ThisWeek.matches(at(2024, 5, 26, 0), june_first));
        assert!(!DateFilter::ThisWeek.matches(at(2024, 5, 25, 23), june_first));
        assert!(!DateFilter::ThisMonth.matches(at(2024, 5, 26, 0), june_first));
    }

    #[test]
    fn month_and_year_windows() {
        let now = now();
        assert!(DateFilter::ThisMonth.matches(at(2024, 5, 1, 0), now));
        assert!(!DateFilter::ThisMonth.matches(at(2023, 5, 15, 0), now));
        assert!(DateFilter::ThisYear.matches(at(2024, 12, 31, 23), now));
        assert!(!DateFilter::ThisYear.matches(at(2025, 1, 1, 0), now));
    }

    #[test]
    fn pet_filter_checks_membership() {
        let records = vec![
            activity("a", "1", now(), "Walk", ""),
            activity("b", "2", now(), "Walk", ""),
        ];
        let shown = visible(&records, &PetFilter::Pet("2".into()), DateFilter::All, "", now());
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, "b");
    }

    #[test]
    fn search_hits_category_or_notes() {
        let records = vec![
            activity("a", "1", now(), "Fetch", ""),
            activity("b", "1", now(), "Walk", "played FETCH after"),
            activity("c", "1", now(), "Nap", "quiet"),
        ];
        let shown = visible(&records, &PetFilter::All, DateFilter::All, "fetch", now());
        let ids: Vec<_> = shown.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn whitespace_only_search_matches_everything() {
        let records = vec![
            activity("a", "1", now(), "Walk", ""),
            activity("b", "1", now(), "Nap", "no spaces"),
        ];
        assert_eq!(visible(&records, &PetFilter::All, DateFilter::All, "   ", now()).len(), 2);
    }

    #[test]
    fn meal_search_includes_meal_type() {
        let meal = Record {
            id: "m".into(),
            pet_ids: vec!["1".into()],
            date: now(),
            details: Meal::new("Breakfast", "Kibble", "50", "g"),
            notes: String::new(),
        };
        assert!(matches_search(&meal, "break"));
        assert!(matches_search(&meal, "KIB"));
        assert!(!matches_search(&meal, "dinner"));
    }

    #[test]
    fn filters_combine_with_and() {
        let records = vec![
            activity("a", "1", now(), "Walk", ""),
            activity("b", "1", at(2024, 1, 2, 9), "Walk", ""),
            activity("c", "2", now(), "Walk", ""),
        ];
        let filters = Filters {
            pet: PetFilter::Pet("1".into()),
            date: DateFilter::ThisMonth,
            search: "walk".into(),
        };
        let shown = filters.apply(&records, now());
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, "a");
    }

    #[test]
    fn filter_labels_parse() {
        assert_eq!("This Week".parse::<DateFilter>(), Ok(DateFilter::ThisWeek));
        assert_eq!("today".parse::<DateFilter>(), Ok(DateFilter::Today));
        assert!("Next Week".parse::<DateFilter>().is_err());
        assert_eq!(PetFilter::from("all".to_string()), PetFilter::All);
        assert_eq!(PetFilter::from("3".to_string()), PetFilter::Pet("3".into()));
    }
}
