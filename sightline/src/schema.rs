//! Static field-path schema for the observation index.
//!
//! Every dotted path a predicate or projection may reference is listed here.
//! Projection paths are validated against this table at compile time of the
//! query, replacing dynamic property resolution: an unknown path fails the
//! request instead of silently returning an empty column.

use once_cell::sync::Lazy;
use std::collections::HashSet;

// occurrence fields
pub const OCCURRENCE_ID: &str = "occurrence.occurrenceId";
pub const OCCURRENCE_STATUS: &str = "occurrence.occurrenceStatus";
pub const IS_POSITIVE_OBSERVATION: &str = "occurrence.isPositiveObservation";
pub const INDIVIDUAL_COUNT: &str = "occurrence.individualCount";
pub const OCCURRENCE_REMARKS: &str = "occurrence.occurrenceRemarks";
pub const REPORTED_BY: &str = "occurrence.reportedBy";

// taxon fields
pub const TAXON_ID: &str = "taxon.id";
pub const SCIENTIFIC_NAME: &str = "taxon.scientificName";
pub const VERNACULAR_NAME: &str = "taxon.vernacularName";
pub const REDLIST_CATEGORY: &str = "taxon.attributes.redlistCategory";
pub const ORGANISM_GROUP: &str = "taxon.attributes.organismGroup";

// event fields
pub const START_DATE: &str = "event.startDate";
pub const END_DATE: &str = "event.endDate";
pub const EVENT_ID: &str = "event.eventId";

// location fields
pub const POINT: &str = "location.point";
pub const POINT_LOCATION: &str = "location.pointLocation";
pub const POINT_WITH_BUFFER: &str = "location.pointWithBuffer";
pub const POINT_WITH_DISTURBANCE_BUFFER: &str = "location.pointWithDisturbanceBuffer";
pub const LOCATION_ID: &str = "location.locationId";
pub const COORDINATE_UNCERTAINTY: &str = "location.coordinateUncertaintyInMeters";
pub const DECIMAL_LATITUDE: &str = "location.decimalLatitude";
pub const DECIMAL_LONGITUDE: &str = "location.decimalLongitude";
pub const LOCALITY: &str = "location.locality";
pub const COUNTY_FEATURE_ID: &str = "location.county.featureId";
pub const COUNTY_NAME: &str = "location.county.name";
pub const MUNICIPALITY_FEATURE_ID: &str = "location.municipality.featureId";
pub const MUNICIPALITY_NAME: &str = "location.municipality.name";
pub const PARISH_FEATURE_ID: &str = "location.parish.featureId";
pub const PARISH_NAME: &str = "location.parish.name";
pub const PROVINCE_FEATURE_ID: &str = "location.province.featureId";
pub const PROVINCE_NAME: &str = "location.province.name";
pub const COUNTRY_REGION_FEATURE_ID: &str = "location.countryRegion.featureId";
pub const COUNTRY_REGION_NAME: &str = "location.countryRegion.name";

// identification fields
pub const VERIFIED: &str = "identification.verified";

// data stewardship fields
pub const DATASET_IDENTIFIER: &str = "dataStewardship.datasetIdentifier";
pub const DATASET_TITLE: &str = "dataStewardship.datasetTitle";

// record-level fields
pub const SENSITIVE: &str = "sensitive";
pub const SENSITIVITY_CATEGORY: &str = "sensitivityCategory";
pub const MODIFIED: &str = "modified";

// internal fields, never part of public output presets
pub const REPORTED_BY_USER_ID: &str = "internal.reportedByUserId";
pub const RECORDED_BY: &str = "internal.recordedBy";
pub const RECORDED_BY_USER_ID: &str = "internal.recordedBy.userId";
pub const RECORDED_BY_VIEW_ACCESS: &str = "internal.recordedBy.viewAccess";
pub const SIGHTING_TYPE_SEARCH_GROUP_ID: &str = "internal.sightingTypeSearchGroupId";
pub const IS_MERGED_RECORD: &str = "internal.isMergedRecord";
pub const INCLUDED_IN_MERGED_RECORD: &str = "internal.includedInMergedRecord";

/// Every leaf path in the observation index schema.
pub static FIELD_PATHS: &[&str] = &[
    OCCURRENCE_ID,
    OCCURRENCE_STATUS,
    IS_POSITIVE_OBSERVATION,
    INDIVIDUAL_COUNT,
    OCCURRENCE_REMARKS,
    REPORTED_BY,
    TAXON_ID,
    SCIENTIFIC_NAME,
    VERNACULAR_NAME,
    REDLIST_CATEGORY,
    ORGANISM_GROUP,
    START_DATE,
    END_DATE,
    EVENT_ID,
    POINT,
    POINT_LOCATION,
    POINT_WITH_BUFFER,
    POINT_WITH_DISTURBANCE_BUFFER,
    LOCATION_ID,
    COORDINATE_UNCERTAINTY,
    DECIMAL_LATITUDE,
    DECIMAL_LONGITUDE,
    LOCALITY,
    COUNTY_FEATURE_ID,
    COUNTY_NAME,
    MUNICIPALITY_FEATURE_ID,
    MUNICIPALITY_NAME,
    PARISH_FEATURE_ID,
    PARISH_NAME,
    PROVINCE_FEATURE_ID,
    PROVINCE_NAME,
    COUNTRY_REGION_FEATURE_ID,
    COUNTRY_REGION_NAME,
    VERIFIED,
    DATASET_IDENTIFIER,
    DATASET_TITLE,
    SENSITIVE,
    SENSITIVITY_CATEGORY,
    MODIFIED,
    REPORTED_BY_USER_ID,
    RECORDED_BY_USER_ID,
    RECORDED_BY_VIEW_ACCESS,
    SIGHTING_TYPE_SEARCH_GROUP_ID,
    IS_MERGED_RECORD,
    INCLUDED_IN_MERGED_RECORD,
];

static PATH_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| FIELD_PATHS.iter().copied().collect());

/// Checks whether a dotted path names a schema leaf or a schema subtree.
///
/// A subtree prefix such as `taxon` or `location.county` is valid because
/// selecting it selects every leaf below it.
pub fn is_valid_path(path: &str) -> bool {
    if PATH_SET.contains(path) {
        return true;
    }
    let prefix = format!("{}.", path);
    FIELD_PATHS.iter().any(|p| p.starts_with(&prefix))
}
