use chrono::{NaiveDate, NaiveDateTime};

/// How the start/end bounds of a [DateFilter] apply to a record's event
/// interval.
///
/// The JSON contract uses these exact variant names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DateRangeFilterType {
    /// The record's interval lies inside the filter bounds:
    /// `start >= from AND end <= to`.
    #[default]
    BetweenStartDateAndEndDate,
    /// The record's interval overlaps the filter bounds anywhere:
    /// `start <= to AND end >= from`.
    OverlappingStartDateAndEndDate,
    /// Both bounds apply to the start date alone.
    OnlyStartDate,
    /// Both bounds apply to the end date alone.
    OnlyEndDate,
}

/// Time-of-day bucket over the start instant's hour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TimeOfDay {
    Morning,
    Forenoon,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// The fixed hour set this bucket covers. Night wraps midnight.
    pub fn hours(&self) -> &'static [i64] {
        match self {
            TimeOfDay::Morning => &[4, 5, 6, 7, 8],
            TimeOfDay::Forenoon => &[9, 10, 11, 12],
            TimeOfDay::Afternoon => &[13, 14, 15, 16, 17],
            TimeOfDay::Evening => &[18, 19, 20, 21, 22],
            TimeOfDay::Night => &[23, 0, 1, 2, 3],
        }
    }
}

/// Temporal criteria of a search filter.
///
/// `start_date`/`end_date` are calendar dates; compilation widens them to
/// whole days (`00:00:00` and `23:59:59`, both ends inclusive). With
/// `use_period_for_all_years` set, the [from, to] interval recurs every
/// year and matching is day-of-year based, leap-year aware.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub date_filter_type: DateRangeFilterType,
    pub use_period_for_all_years: bool,
    pub time_ranges: Vec<TimeOfDay>,
}

impl DateFilter {
    /// Checks whether the filter carries no criteria.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.time_ranges.is_empty()
    }
}

/// Record-modification-timestamp criteria; either end may be open.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModifiedDateFilter {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl ModifiedDateFilter {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}
