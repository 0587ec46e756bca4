use crate::schema;

/// Named output field presets, expanded into dotted include paths at
/// compilation.
///
/// `AllWithValues` and `All` expand to no include list at all (the engine
/// returns every stored field); dropping fields that hold no value is the
/// execution layer's concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputFieldSet {
    Minimum,
    Extended,
    AllWithValues,
    All,
}

static MINIMUM_FIELDS: &[&str] = &[
    schema::OCCURRENCE_ID,
    schema::TAXON_ID,
    schema::SCIENTIFIC_NAME,
    schema::VERNACULAR_NAME,
    schema::START_DATE,
    schema::END_DATE,
    schema::DECIMAL_LATITUDE,
    schema::DECIMAL_LONGITUDE,
    schema::LOCALITY,
    schema::SENSITIVE,
];

static EXTENDED_FIELDS: &[&str] = &[
    schema::OCCURRENCE_ID,
    schema::OCCURRENCE_STATUS,
    schema::IS_POSITIVE_OBSERVATION,
    schema::INDIVIDUAL_COUNT,
    schema::REPORTED_BY,
    schema::TAXON_ID,
    schema::SCIENTIFIC_NAME,
    schema::VERNACULAR_NAME,
    schema::REDLIST_CATEGORY,
    schema::ORGANISM_GROUP,
    schema::START_DATE,
    schema::END_DATE,
    schema::EVENT_ID,
    schema::DECIMAL_LATITUDE,
    schema::DECIMAL_LONGITUDE,
    schema::COORDINATE_UNCERTAINTY,
    schema::LOCALITY,
    schema::COUNTY_NAME,
    schema::MUNICIPALITY_NAME,
    schema::PROVINCE_NAME,
    schema::VERIFIED,
    schema::DATASET_IDENTIFIER,
    schema::DATASET_TITLE,
    schema::SENSITIVE,
    schema::SENSITIVITY_CATEGORY,
    schema::MODIFIED,
];

impl OutputFieldSet {
    /// The include paths this preset expands to; empty means "everything".
    pub fn preset_paths(&self) -> &'static [&'static str] {
        match self {
            OutputFieldSet::Minimum => MINIMUM_FIELDS,
            OutputFieldSet::Extended => EXTENDED_FIELDS,
            OutputFieldSet::AllWithValues | OutputFieldSet::All => &[],
        }
    }
}

/// Output-shaping criteria of a search filter: a preset, extra include
/// paths on top of it, and paths to strip from the result documents.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputFilter {
    pub field_set: Option<OutputFieldSet>,
    pub fields: Vec<String>,
    pub exclude_fields: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_is_subset_of_extended() {
        for path in MINIMUM_FIELDS {
            assert!(
                EXTENDED_FIELDS.contains(path),
                "{} missing from the extended preset",
                path
            );
        }
        assert!(MINIMUM_FIELDS.len() < EXTENDED_FIELDS.len());
    }

    #[test]
    fn test_preset_paths_are_schema_valid() {
        for path in MINIMUM_FIELDS.iter().chain(EXTENDED_FIELDS) {
            assert!(schema::is_valid_path(path), "{} not in schema", path);
        }
    }

    #[test]
    fn test_all_presets_expand_to_everything() {
        assert!(OutputFieldSet::All.preset_paths().is_empty());
        assert!(OutputFieldSet::AllWithValues.preset_paths().is_empty());
    }

    #[test]
    fn test_presets_never_leak_internal_fields() {
        for path in MINIMUM_FIELDS.iter().chain(EXTENDED_FIELDS) {
            assert!(!path.starts_with("internal."), "{} leaks internal data", path);
        }
    }

    #[test]
    fn test_output_filter_deserializes_contract_json() {
        let filter: OutputFilter = serde_json::from_str(
            r#"{"fieldSet": "Minimum", "fields": ["occurrence.occurrenceRemarks"]}"#,
        )
        .unwrap();
        assert_eq!(filter.field_set, Some(OutputFieldSet::Minimum));
        assert_eq!(filter.fields, vec!["occurrence.occurrenceRemarks"]);
        assert!(filter.exclude_fields.is_empty());
    }
}
