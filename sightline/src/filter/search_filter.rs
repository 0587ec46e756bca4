use super::{
    DateFilter, ExtendedAuthorizationFilter, GeographicsFilter, LocationFilter,
    ModifiedDateFilter, OutputFilter, SightingTypeFilter, TaxonFilter,
};

/// Records to drop from the result set regardless of the other criteria.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExcludeFilter {
    pub occurrence_ids: Vec<String>,
    pub taxon_ids: Vec<i32>,
}

impl ExcludeFilter {
    pub fn is_empty(&self) -> bool {
        self.occurrence_ids.is_empty() && self.taxon_ids.is_empty()
    }
}

/// Data-stewardship criteria: restrict to named datasets.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataStewardshipFilter {
    pub dataset_identifiers: Vec<String>,
}

/// The root search filter of the platform's JSON contract.
///
/// A `SearchFilter` aggregates every sub-filter a caller may send. All
/// parts are optional; an absent sub-filter contributes no constraint.
/// Instances are immutable per request: the compiler walks the filter and
/// produces a predicate tree plus a field projection without mutating it.
///
/// # Examples
///
/// ```rust,ignore
/// use sightline::filter::SearchFilter;
///
/// let filter: SearchFilter = serde_json::from_str(
///     r#"{"taxon": {"ids": [100077]}, "verifiedOnly": true}"#,
/// )?;
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilter {
    pub taxon: Option<TaxonFilter>,
    pub location: Option<LocationFilter>,
    pub geographics: Option<GeographicsFilter>,
    pub date: Option<DateFilter>,
    pub modified_date: Option<ModifiedDateFilter>,
    pub event_ids: Vec<String>,
    pub data_stewardship: Option<DataStewardshipFilter>,
    pub extended_authorization: Option<ExtendedAuthorizationFilter>,
    pub positive_sightings_only: bool,
    pub verified_only: bool,
    pub sighting_type: Option<SightingTypeFilter>,
    pub exclude: Option<ExcludeFilter>,
    pub output: Option<OutputFilter>,
}
