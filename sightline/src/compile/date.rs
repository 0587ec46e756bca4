//! Date/time filter compilation.
//!
//! Calendar bounds widen to whole days (00:00:00 / 23:59:59, both ends
//! inclusive). Time-of-day buckets and recurring yearly periods compile to
//! script predicates because they test derived values (hour of day, day of
//! year) the index does not store as fields.

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use itertools::Itertools;

use crate::filter::{DateFilter, DateRangeFilterType};
use crate::predicate::{Predicate, ScriptParam};

/// Fixed representative leap year for materializing recurring periods.
pub(crate) const LEAP_PROBE_YEAR: i32 = 2020;
/// Fixed representative common year for materializing recurring periods.
pub(crate) const COMMON_PROBE_YEAR: i32 = 2021;

const TIME_OF_DAY_SCRIPT: &str =
    "params.hours.contains(doc[params.field].value.getHour())";

const RECURRING_PERIOD_SCRIPT: &str = "(Year.isLeap(doc[params.field].value.getYear()) \
     ? params.leapDays : params.commonDays)\
     .contains(doc[params.field].value.getDayOfYear())";

/// Compiles a date filter against a start/end date field pair.
///
/// Returns `None` when the filter carries nothing applicable; a mode that
/// would produce an unbounded scan (OnlyStart/OnlyEnd with a missing bound)
/// also compiles to nothing.
pub(crate) fn compile_date_filter(
    filter: &DateFilter,
    start_field: &str,
    end_field: &str,
) -> Option<Predicate> {
    if filter.is_empty() {
        return None;
    }

    let mut parts: Vec<Predicate> = Vec::new();

    match (
        filter.use_period_for_all_years,
        filter.start_date,
        filter.end_date,
    ) {
        (true, Some(from), Some(to)) => {
            parts.push(recurring_period_predicate(from, to, start_field));
        }
        // the recurring flag needs both bounds; fall back to the plain mode
        _ => {
            if let Some(predicate) = range_predicate(filter, start_field, end_field) {
                parts.push(predicate);
            }
        }
    }

    if !filter.time_ranges.is_empty() {
        parts.push(time_of_day_predicate(filter, start_field));
    }

    combine(parts)
}

fn combine(mut parts: Vec<Predicate>) -> Option<Predicate> {
    match parts.len() {
        0 => None,
        1 => Some(parts.remove(0)),
        _ => Some(Predicate::Bool {
            must: parts,
            should: Vec::new(),
            must_not: Vec::new(),
            filter: Vec::new(),
        }),
    }
}

fn range_predicate(
    filter: &DateFilter,
    start_field: &str,
    end_field: &str,
) -> Option<Predicate> {
    let from = filter.start_date.and_then(|d| d.and_hms_opt(0, 0, 0));
    let to = filter.end_date.and_then(|d| d.and_hms_opt(23, 59, 59));

    let mut parts: Vec<Predicate> = Vec::new();
    match filter.date_filter_type {
        DateRangeFilterType::BetweenStartDateAndEndDate => {
            // start >= from AND end <= to, each side independent
            if from.is_some() {
                parts.push(Predicate::date_range(start_field, from, None));
            }
            if to.is_some() {
                parts.push(Predicate::date_range(end_field, None, to));
            }
        }
        DateRangeFilterType::OverlappingStartDateAndEndDate => {
            // start <= to AND end >= from
            if to.is_some() {
                parts.push(Predicate::date_range(start_field, None, to));
            }
            if from.is_some() {
                parts.push(Predicate::date_range(end_field, from, None));
            }
        }
        DateRangeFilterType::OnlyStartDate => {
            if from.is_some() && to.is_some() {
                parts.push(Predicate::date_range(start_field, from, to));
            }
        }
        DateRangeFilterType::OnlyEndDate => {
            if from.is_some() && to.is_some() {
                parts.push(Predicate::date_range(end_field, from, to));
            }
        }
    }
    combine(parts)
}

fn time_of_day_predicate(filter: &DateFilter, start_field: &str) -> Predicate {
    let hours: Vec<i64> = filter
        .time_ranges
        .iter()
        .flat_map(|bucket| bucket.hours().iter().copied())
        .sorted()
        .dedup()
        .collect();

    let mut params = IndexMap::new();
    params.insert("field".to_string(), ScriptParam::from(start_field));
    params.insert("hours".to_string(), ScriptParam::from(hours));
    Predicate::script(TIME_OF_DAY_SCRIPT, params)
}

fn recurring_period_predicate(from: NaiveDate, to: NaiveDate, start_field: &str) -> Predicate {
    let leap_days = day_of_year_set(from, to, LEAP_PROBE_YEAR);
    let common_days = day_of_year_set(from, to, COMMON_PROBE_YEAR);

    let mut params = IndexMap::new();
    params.insert("field".to_string(), ScriptParam::from(start_field));
    params.insert("leapDays".to_string(), ScriptParam::from(leap_days));
    params.insert("commonDays".to_string(), ScriptParam::from(common_days));
    Predicate::script(RECURRING_PERIOD_SCRIPT, params)
}

/// Materializes the day-of-year ordinals the recurring [from, to] interval
/// occupies in the given probe year.
///
/// A Feb-29 bound that does not exist in the probe year clamps inward
/// (start to Mar 1, end to Feb 28) so both ends of the interval stay
/// exercised. An interval that collapses entirely under clamping (Feb 29
/// alone in a common year) yields the empty set.
pub(crate) fn day_of_year_set(from: NaiveDate, to: NaiveDate, probe_year: i32) -> Vec<i64> {
    let wraps = (from.month(), from.day()) > (to.month(), to.day());
    let start = resolve_probe_date(from, probe_year, false);
    let end = resolve_probe_date(to, probe_year, true);
    let start_doy = start.ordinal() as i64;
    let end_doy = end.ordinal() as i64;

    if start_doy <= end_doy {
        (start_doy..=end_doy).collect()
    } else if wraps {
        // crosses Dec 31 -> Jan 1
        let days_in_year = last_ordinal(probe_year);
        (start_doy..=days_in_year).chain(1..=end_doy).collect()
    } else {
        Vec::new()
    }
}

fn resolve_probe_date(date: NaiveDate, probe_year: i32, clamp_to_end: bool) -> NaiveDate {
    NaiveDate::from_ymd_opt(probe_year, date.month(), date.day()).unwrap_or_else(|| {
        // Feb 29 resolved in a common year
        let clamped = if clamp_to_end {
            NaiveDate::from_ymd_opt(probe_year, 2, 28)
        } else {
            NaiveDate::from_ymd_opt(probe_year, 3, 1)
        };
        clamped.unwrap_or(date)
    })
}

fn last_ordinal(year: i32) -> i64 {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(|d| d.ordinal() as i64)
        .unwrap_or(365)
}
