/// How merged (aggregated) records interact with the result set.
///
/// The JSON contract uses these exact variant names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SightingTypeMode {
    /// Hide records that are merges of other records.
    #[default]
    DoNotShowMerged,
    /// Show only merged records.
    ShowOnlyMerged,
    /// Show merged records and their parts alike.
    ShowBoth,
    /// Hide the records a merged record was built from.
    DoNotShowSightingsInMerged,
}

/// Search group a record's sighting type belongs to. The discriminant is
/// the group id stored on the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(i32)]
pub enum SightingTypeSearchGroup {
    Ordinary = 1,
    Assessment = 2,
    Aggregated = 4,
    AggregationChild = 8,
    AssessmentChild = 16,
    Replacement = 32,
    OwnBreedingAssessment = 64,
}

impl SightingTypeSearchGroup {
    /// The group id stored on records.
    #[inline]
    pub fn group_id(&self) -> i32 {
        *self as i32
    }
}

/// Sighting-type criteria of a search filter: the merged-record mode plus
/// an optional explicit search-group selection.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SightingTypeFilter {
    pub mode: SightingTypeMode,
    pub search_groups: Vec<SightingTypeSearchGroup>,
}
