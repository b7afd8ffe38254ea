use crate::metadata::PhotoRecord;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// How the `name` predicate compares against `display_name`. Both modes
/// ignore case.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NameMatch {
    #[default]
    Contains,
    Exact,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    /// Captured on this calendar day.
    On(NaiveDate),
    /// Captured between midnight starting `from` and midnight starting `to`,
    /// both instants inclusive; a missing bound is open. A photo taken later
    /// on the `to` day falls outside.
    Range { from: Option<NaiveDate>, to: Option<NaiveDate> },
}

impl DateFilter {
    fn is_unbounded(&self) -> bool {
        matches!(self, DateFilter::Range { from: None, to: None })
    }

    fn admits(&self, taken: NaiveDateTime) -> bool {
        match *self {
            DateFilter::On(date) => taken.date() == date,
            DateFilter::Range { from, to } => {
                from.map_or(true, |f| taken >= midnight(f)) && to.map_or(true, |t| taken <= midnight(t))
            }
        }
    }
}

fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Set of independent predicates, ANDed together. Unset or blank fields
/// impose no constraint.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Query {
    pub name: Option<String>,
    #[serde(default)]
    pub name_match: NameMatch,
    pub city: Option<String>,
    pub country: Option<String>,
    pub date: Option<DateFilter>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name_match(mut self, mode: NameMatch) -> Self {
        self.name_match = mode;
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(DateFilter::On(date));
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date = Some(DateFilter::Range {
            from: Some(from),
            to: Some(to),
        });
        self
    }

    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date = Some(DateFilter::Range { from, to });
        self
    }

    pub fn matches(&self, record: &PhotoRecord) -> bool {
        self.name_ok(record) && self.city_ok(record) && self.country_ok(record) && self.date_ok(record)
    }

    fn name_ok(&self, record: &PhotoRecord) -> bool {
        let Some(wanted) = active(&self.name) else {
            return true;
        };
        let name = record.display_name.to_lowercase();
        let wanted = wanted.to_lowercase();
        match self.name_match {
            NameMatch::Contains => name.contains(&wanted),
            NameMatch::Exact => name == wanted,
        }
    }

    fn city_ok(&self, record: &PhotoRecord) -> bool {
        equals_ignore_case(active(&self.city), record.city.as_deref())
    }

    fn country_ok(&self, record: &PhotoRecord) -> bool {
        equals_ignore_case(active(&self.country), record.country.as_deref())
    }

    fn date_ok(&self, record: &PhotoRecord) -> bool {
        match &self.date {
            None => true,
            Some(filter) if filter.is_unbounded() => true,
            Some(filter) => record.capture_time.map_or(false, |t| filter.admits(t)),
        }
    }
}

/// A predicate string that is absent or only whitespace counts as unset.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn equals_ignore_case(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted, actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(w), Some(a)) => w.to_lowercase() == a.to_lowercase(),
    }
}

/// Records satisfying `query`, in the order given.
pub fn run<'a, I>(records: I, query: &Query) -> Vec<&'a PhotoRecord>
where
    I: IntoIterator<Item = &'a PhotoRecord>,
{
    records.into_iter().filter(|r| query.matches(r)).collect()
}
