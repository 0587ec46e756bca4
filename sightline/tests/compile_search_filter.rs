//! End-to-end compilation tests over the JSON filter contract.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use sightline::compile::SearchCompiler;
use sightline::errors::ErrorKind;
use sightline::filter::{
    AreaGrant, DataStewardshipFilter, DateFilter, ExcludeFilter, ExtendedAuthorizationFilter,
    GeographicsFilter, LocationFilter, ModifiedDateFilter, OutputFieldSet, OutputFilter,
    ProtectionFilter, SearchFilter, SightingTypeFilter, SightingTypeMode,
    SightingTypeSearchGroup, TaxonFilter, TimeOfDay,
};
use sightline::predicate::{Predicate, ScriptParam};
use sightline::schema;

#[ctor::ctor]
fn init() {
    colog::init();
}

static COMPILER: Lazy<SearchCompiler> =
    Lazy::new(|| SearchCompiler::new().expect("projection pipelines must build"));

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn public_only() -> Predicate {
    Predicate::term(schema::SENSITIVE, false)
}

/// Pulls the non-scoring AND group out of a compiled predicate.
fn filter_group(predicate: &Predicate) -> &[Predicate] {
    match predicate {
        Predicate::Bool { filter, .. } => filter,
        other => panic!("expected a Bool node, got {:?}", other),
    }
}

#[test]
fn test_public_mode_never_builds_a_sensitive_branch() {
    let filter: SearchFilter = serde_json::from_str(
        r#"{
            "extendedAuthorization": {
                "userId": 4771,
                "protectionFilter": "Public",
                "grants": [{"maxProtectionLevel": 5, "taxonIds": [7]}]
            }
        }"#,
    )
    .unwrap();
    let compiled = COMPILER.compile(&filter).unwrap();

    assert_eq!(compiled.predicate, public_only());
    assert!(!compiled.generalization_visible);
    let json = serde_json::to_string(&compiled.predicate).unwrap();
    assert!(!json.contains(schema::SENSITIVITY_CATEGORY));
}

#[test]
fn test_between_dates_compile_inclusive_on_both_ends() {
    let filter = SearchFilter {
        date: Some(DateFilter {
            start_date: Some(date(2024, 6, 1)),
            end_date: Some(date(2024, 6, 30)),
            ..DateFilter::default()
        }),
        ..SearchFilter::default()
    };
    let compiled = COMPILER.compile(&filter).unwrap();

    let parts = filter_group(&compiled.predicate);
    let from = date(2024, 6, 1).and_hms_opt(0, 0, 0);
    let to = date(2024, 6, 30).and_hms_opt(23, 59, 59);
    assert_eq!(
        parts[0],
        Predicate::Bool {
            must: vec![
                Predicate::date_range(schema::START_DATE, from, None),
                Predicate::date_range(schema::END_DATE, None, to),
            ],
            should: vec![],
            must_not: vec![],
            filter: vec![],
        }
    );
    assert_eq!(parts[1], public_only());
}

#[test]
fn test_recurring_period_covers_the_leap_day_in_both_probe_sets() {
    let filter = SearchFilter {
        date: Some(DateFilter {
            start_date: Some(date(2024, 2, 28)),
            end_date: Some(date(2024, 3, 2)),
            use_period_for_all_years: true,
            ..DateFilter::default()
        }),
        ..SearchFilter::default()
    };
    let compiled = COMPILER.compile(&filter).unwrap();

    let parts = filter_group(&compiled.predicate);
    if let Predicate::Script { params, .. } = &parts[0] {
        // Feb 28 is day 59 in both probes; the leap probe runs through Mar 2
        // = day 62, the common probe through Mar 2 = day 61.
        assert_eq!(
            params.get("leapDays"),
            Some(&ScriptParam::from(vec![59i64, 60, 61, 62]))
        );
        assert_eq!(
            params.get("commonDays"),
            Some(&ScriptParam::from(vec![59i64, 60, 61]))
        );
    } else {
        panic!("expected a Script node, got {:?}", parts[0]);
    }
}

#[test]
fn test_time_of_day_buckets_compile_to_hour_membership() {
    let filter = SearchFilter {
        date: Some(DateFilter {
            time_ranges: vec![TimeOfDay::Morning],
            ..DateFilter::default()
        }),
        ..SearchFilter::default()
    };
    let compiled = COMPILER.compile(&filter).unwrap();

    let parts = filter_group(&compiled.predicate);
    if let Predicate::Script { params, .. } = &parts[0] {
        assert_eq!(
            params.get("hours"),
            Some(&ScriptParam::from(vec![4i64, 5, 6, 7, 8]))
        );
        assert_eq!(
            params.get("field"),
            Some(&ScriptParam::from(schema::START_DATE))
        );
    } else {
        panic!("expected a Script node, got {:?}", parts[0]);
    }
}

#[test]
fn test_grant_caps_protection_level_and_taxa() {
    let filter: SearchFilter = serde_json::from_str(
        r#"{
            "extendedAuthorization": {
                "protectionFilter": "BothPublicAndSensitive",
                "grants": [{"maxProtectionLevel": 2, "taxonIds": [7]}]
            }
        }"#,
    )
    .unwrap();
    let compiled = COMPILER.compile(&filter).unwrap();
    assert!(compiled.generalization_visible);

    let grant_branch = Predicate::all_of(vec![
        Predicate::term(schema::SENSITIVE, true),
        Predicate::at_most(schema::SENSITIVITY_CATEGORY, 2i32),
        Predicate::terms(schema::TAXON_ID, vec![7i32]),
    ]);
    assert_eq!(
        compiled.predicate,
        Predicate::any_of(vec![public_only(), grant_branch])
    );
}

#[test]
fn test_empty_geographics_filter_adds_no_predicate() {
    let filter = SearchFilter {
        geographics: Some(GeographicsFilter::default()),
        ..SearchFilter::default()
    };
    let compiled = COMPILER.compile(&filter).unwrap();
    assert_eq!(compiled.predicate, public_only());
}

#[test]
fn test_projected_geometry_reaches_the_tree_in_wgs84() {
    let filter: SearchFilter = serde_json::from_str(
        r#"{
            "geographics": {
                "geometries": [{
                    "type": "Polygon",
                    "coordinates": [[
                        [551045.0, 6873395.0],
                        [553045.0, 6873395.0],
                        [553045.0, 6875395.0],
                        [551045.0, 6875395.0],
                        [551045.0, 6873395.0]
                    ]]
                }],
                "coordinateSystem": "epsg:3006"
            }
        }"#,
    )
    .unwrap();
    let compiled = COMPILER.compile(&filter).unwrap();

    let parts = filter_group(&compiled.predicate);
    if let Predicate::GeoShape { field, shape, .. } = &parts[0] {
        assert_eq!(field, schema::POINT);
        if let geojson::Value::Polygon(rings) = &shape.value {
            for position in &rings[0] {
                assert!((15.0..17.0).contains(&position[0]), "lon {}", position[0]);
                assert!((61.0..63.0).contains(&position[1]), "lat {}", position[1]);
            }
        } else {
            panic!("expected a polygon, got {:?}", shape.value);
        }
    } else {
        panic!("expected a GeoShape node, got {:?}", parts[0]);
    }
}

#[test]
fn test_unknown_coordinate_system_fails_the_request() {
    let filter: SearchFilter = serde_json::from_str(
        r#"{
            "geographics": {
                "geometries": [{"type": "Point", "coordinates": [15.0, 62.0]}],
                "maxDistanceFromPoint": 1000.0,
                "coordinateSystem": "epsg:2154"
            }
        }"#,
    )
    .unwrap();
    let err = COMPILER.compile(&filter).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::CrsError);
}

#[test]
fn test_unknown_output_path_fails_the_request() {
    let filter: SearchFilter = serde_json::from_str(
        r#"{"output": {"fields": ["location.bogus"]}}"#,
    )
    .unwrap();
    let err = COMPILER.compile(&filter).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidFieldName);
}

#[test]
fn test_empty_group_helpers_keep_their_polarity() {
    assert_eq!(Predicate::all_of(vec![]), Predicate::match_none());
    assert_eq!(Predicate::any_of(vec![]), Predicate::match_all());
    assert_eq!(
        serde_json::to_string(&Predicate::match_all()).unwrap(),
        r#"{"Bool":{}}"#
    );
}

#[test]
fn test_json_contract_compiles_identically_to_a_code_built_filter() {
    let from_json: SearchFilter = serde_json::from_str(
        r#"{
            "taxon": {"ids": [100077, 103025], "redListCategories": ["CR", "EN"]},
            "location": {"countyIds": ["1"], "municipalityIds": ["380"], "maxAccuracy": 500},
            "geographics": {
                "geometries": [{
                    "type": "Polygon",
                    "coordinates": [[
                        [15.0, 62.0], [16.0, 62.0], [16.0, 63.0],
                        [15.0, 63.0], [15.0, 62.0]
                    ]]
                }],
                "considerObservationAccuracy": true
            },
            "date": {
                "startDate": "2024-06-01",
                "endDate": "2024-06-30",
                "dateFilterType": "BetweenStartDateAndEndDate",
                "timeRanges": ["Morning", "Evening"]
            },
            "modifiedDate": {"from": "2024-01-01T00:00:00"},
            "eventIds": ["urn:lsid:event:1"],
            "dataStewardship": {"datasetIdentifiers": ["ds-1"]},
            "extendedAuthorization": {
                "userId": 4771,
                "protectionFilter": "BothPublicAndSensitive",
                "grants": [{"maxProtectionLevel": 2, "taxonIds": [7]}]
            },
            "positiveSightingsOnly": true,
            "verifiedOnly": true,
            "sightingType": {
                "mode": "DoNotShowMerged",
                "searchGroups": ["Ordinary", "Assessment"]
            },
            "exclude": {"occurrenceIds": ["urn:occ:9"]},
            "output": {"fieldSet": "Minimum", "fields": ["location.locality"]}
        }"#,
    )
    .unwrap();

    let in_code = SearchFilter {
        taxon: Some(TaxonFilter {
            ids: vec![100077, 103025],
            red_list_categories: vec!["CR".to_string(), "EN".to_string()],
        }),
        location: Some(LocationFilter {
            county_ids: vec!["1".to_string()],
            municipality_ids: vec!["380".to_string()],
            max_accuracy: Some(500),
            ..LocationFilter::default()
        }),
        geographics: Some(GeographicsFilter {
            geometries: vec![geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
                vec![15.0, 62.0],
                vec![16.0, 62.0],
                vec![16.0, 63.0],
                vec![15.0, 63.0],
                vec![15.0, 62.0],
            ]]))],
            consider_observation_accuracy: true,
            ..GeographicsFilter::default()
        }),
        date: Some(DateFilter {
            start_date: Some(date(2024, 6, 1)),
            end_date: Some(date(2024, 6, 30)),
            time_ranges: vec![TimeOfDay::Morning, TimeOfDay::Evening],
            ..DateFilter::default()
        }),
        modified_date: Some(ModifiedDateFilter {
            from: date(2024, 1, 1).and_hms_opt(0, 0, 0),
            to: None,
        }),
        event_ids: vec!["urn:lsid:event:1".to_string()],
        data_stewardship: Some(DataStewardshipFilter {
            dataset_identifiers: vec!["ds-1".to_string()],
        }),
        extended_authorization: Some(ExtendedAuthorizationFilter {
            user_id: Some(4771),
            protection_filter: ProtectionFilter::BothPublicAndSensitive,
            grants: vec![AreaGrant {
                max_protection_level: 2,
                taxon_ids: vec![7],
                geographic_area: None,
            }],
        }),
        positive_sightings_only: true,
        verified_only: true,
        sighting_type: Some(SightingTypeFilter {
            mode: SightingTypeMode::DoNotShowMerged,
            search_groups: vec![
                SightingTypeSearchGroup::Ordinary,
                SightingTypeSearchGroup::Assessment,
            ],
        }),
        exclude: Some(ExcludeFilter {
            occurrence_ids: vec!["urn:occ:9".to_string()],
            taxon_ids: vec![],
        }),
        output: Some(OutputFilter {
            field_set: Some(OutputFieldSet::Minimum),
            fields: vec![schema::LOCALITY.to_string()],
            exclude_fields: vec![],
        }),
    };
    assert_eq!(from_json, in_code);

    let compiled_json = COMPILER.compile(&from_json).unwrap();
    let compiled_code = COMPILER.compile(&in_code).unwrap();
    assert_eq!(compiled_json, compiled_code);

    assert!(compiled_code.generalization_visible);
    assert_eq!(
        compiled_code.exclude,
        Some(Predicate::terms(schema::OCCURRENCE_ID, vec!["urn:occ:9"]))
    );
    let includes: Vec<&str> = compiled_code.projection.includes().collect();
    assert!(includes.contains(&schema::OCCURRENCE_ID));
    assert!(includes.contains(&schema::LOCALITY));
}

#[test]
fn test_compiled_predicate_serializes_with_stable_node_names() {
    let filter = SearchFilter {
        verified_only: true,
        ..SearchFilter::default()
    };
    let compiled = COMPILER.compile(&filter).unwrap();
    let json = serde_json::to_value(&compiled.predicate).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "Bool": {
                "filter": [
                    {"Term": {"field": "identification.verified", "value": {"Bool": true}}},
                    {"Term": {"field": "sensitive", "value": {"Bool": false}}}
                ]
            }
        })
    );
}
