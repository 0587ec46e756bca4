use log::error;
use sightline_geo::{CrsTransformer, GeometryNormalizer};

use super::{area, auth, date};
use crate::errors::{ErrorKind, SightlineError, SightlineResult};
use crate::filter::{
    ExcludeFilter, OutputFilter, SearchFilter, SightingTypeFilter, SightingTypeMode,
    SightingTypeSearchGroup,
};
use crate::predicate::{Predicate, PredicateBuilder, Projection};
use crate::schema;

/// The result of compiling a search filter.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledQuery {
    /// The predicate tree every returned record must match.
    pub predicate: Predicate,
    /// A positive predicate tree of records to drop from the result,
    /// when the filter excludes anything.
    pub exclude: Option<Predicate>,
    /// Dotted-path include/exclude projection for the output documents.
    pub projection: Projection,
    /// Whether generalized positions of protected records may be shown.
    pub generalization_visible: bool,
}

/// Compiles search filters into backend-agnostic queries.
///
/// The compiler owns the projection pipeline table and the geometry
/// normalizer. Both are built once and reused across requests; compilation
/// itself is pure and safe to run from any number of threads.
///
/// # Examples
///
/// ```rust,ignore
/// use sightline::compile::SearchCompiler;
/// use sightline::filter::SearchFilter;
///
/// let compiler = SearchCompiler::new()?;
/// let filter: SearchFilter = serde_json::from_str(
///     r#"{"taxon": {"ids": [100077]}, "verifiedOnly": true}"#,
/// )?;
/// let compiled = compiler.compile(&filter)?;
/// ```
pub struct SearchCompiler {
    transformer: CrsTransformer,
    normalizer: GeometryNormalizer,
}

impl SearchCompiler {
    /// Creates a compiler with a freshly built projection pipeline table.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any pairwise projection pipeline
    /// cannot be built. That is a startup failure, never a per-request one.
    pub fn new() -> SightlineResult<Self> {
        let transformer = match CrsTransformer::new() {
            Ok(transformer) => transformer,
            Err(cause) => {
                error!("failed to build the projection pipeline table: {}", cause);
                return Err(SightlineError::new_with_cause(
                    "failed to build the projection pipeline table",
                    ErrorKind::ConfigurationError,
                    cause.into(),
                ));
            }
        };
        Ok(SearchCompiler {
            transformer,
            normalizer: GeometryNormalizer::new(),
        })
    }

    /// Creates a compiler around an existing transformer and normalizer,
    /// so tests and embedders can share or isolate those instances.
    pub fn with_components(transformer: CrsTransformer, normalizer: GeometryNormalizer) -> Self {
        SearchCompiler {
            transformer,
            normalizer,
        }
    }

    /// Compiles a search filter into a predicate tree and projection.
    ///
    /// Absent sub-filters contribute no constraint. The authorization block
    /// always contributes a visibility predicate, even when absent, so the
    /// compiled query never exposes sensitive records by omission.
    pub fn compile(&self, filter: &SearchFilter) -> SightlineResult<CompiledQuery> {
        let mut builder = PredicateBuilder::new();

        if let Some(taxon) = &filter.taxon {
            builder.add_terms(schema::TAXON_ID, taxon.ids.iter().copied());
            builder.add_terms(
                schema::REDLIST_CATEGORY,
                taxon.red_list_categories.iter().cloned(),
            );
        }

        if let Some(location) = &filter.location {
            builder.add_terms(schema::COUNTY_FEATURE_ID, location.county_ids.iter().cloned());
            builder.add_terms(
                schema::MUNICIPALITY_FEATURE_ID,
                location.municipality_ids.iter().cloned(),
            );
            builder.add_terms(schema::PARISH_FEATURE_ID, location.parish_ids.iter().cloned());
            builder.add_terms(
                schema::PROVINCE_FEATURE_ID,
                location.province_ids.iter().cloned(),
            );
            builder.add_terms(
                schema::COUNTRY_REGION_FEATURE_ID,
                location.country_region_ids.iter().cloned(),
            );
            builder.add_terms(schema::LOCATION_ID, location.location_ids.iter().cloned());
            if let Some(max_accuracy) = location.max_accuracy {
                builder.add(Predicate::at_most(
                    schema::COORDINATE_UNCERTAINTY,
                    max_accuracy,
                ));
            }
        }

        if let Some(geographics) = &filter.geographics {
            builder.add_opt(area::compile_geographics(
                geographics,
                &self.transformer,
                &self.normalizer,
            )?);
        }

        if let Some(date) = &filter.date {
            builder.add_opt(date::compile_date_filter(
                date,
                schema::START_DATE,
                schema::END_DATE,
            ));
        }

        if let Some(modified) = &filter.modified_date {
            if !modified.is_empty() {
                builder.add(Predicate::date_range(
                    schema::MODIFIED,
                    modified.from,
                    modified.to,
                ));
            }
        }

        builder.add_terms(schema::EVENT_ID, filter.event_ids.iter().cloned());

        if let Some(stewardship) = &filter.data_stewardship {
            builder.add_terms(
                schema::DATASET_IDENTIFIER,
                stewardship.dataset_identifiers.iter().cloned(),
            );
        }

        builder.add_flag(schema::IS_POSITIVE_OBSERVATION, filter.positive_sightings_only);
        builder.add_flag(schema::VERIFIED, filter.verified_only);

        if let Some(sighting_type) = &filter.sighting_type {
            add_sighting_type(&mut builder, sighting_type);
        }

        let access = auth::evaluate(
            filter.extended_authorization.as_ref(),
            &self.transformer,
            &self.normalizer,
        )?;
        builder.add(access.predicate);

        Ok(CompiledQuery {
            predicate: builder.build().unwrap_or_else(Predicate::match_all),
            exclude: compile_exclude(filter.exclude.as_ref()),
            projection: compile_projection(filter.output.as_ref())?,
            generalization_visible: access.generalization_visible,
        })
    }
}

/// Maps the sighting-type mode and search-group selection onto the
/// merged-record flags and the group-id field.
fn add_sighting_type(builder: &mut PredicateBuilder, sighting_type: &SightingTypeFilter) {
    match sighting_type.mode {
        SightingTypeMode::DoNotShowMerged => {
            builder.add(Predicate::term(schema::IS_MERGED_RECORD, false));
        }
        SightingTypeMode::ShowOnlyMerged => {
            builder.add(Predicate::term(schema::IS_MERGED_RECORD, true));
        }
        SightingTypeMode::ShowBoth => {}
        SightingTypeMode::DoNotShowSightingsInMerged => {
            builder.add(Predicate::term(schema::INCLUDED_IN_MERGED_RECORD, false));
        }
    }

    if sighting_type.search_groups.is_empty() {
        return;
    }
    let group_ids: Vec<i32> = sighting_type
        .search_groups
        .iter()
        .map(SightingTypeSearchGroup::group_id)
        .collect();
    let in_groups = Predicate::terms(schema::SIGHTING_TYPE_SEARCH_GROUP_ID, group_ids);

    // Records predating group classification carry no group id and must
    // match any selection, except a selection of exactly the Assessment
    // group, which is only ever satisfied by classified records.
    if sighting_type.search_groups == [SightingTypeSearchGroup::Assessment] {
        builder.add(in_groups);
    } else {
        builder.add(Predicate::any_of(vec![
            in_groups,
            Predicate::not_exists(schema::SIGHTING_TYPE_SEARCH_GROUP_ID),
        ]));
    }
}

/// Builds the positive tree of records the filter excludes, matching on
/// occurrence id or taxon id.
fn compile_exclude(exclude: Option<&ExcludeFilter>) -> Option<Predicate> {
    let exclude = exclude?;
    let mut parts = Vec::new();
    if !exclude.occurrence_ids.is_empty() {
        parts.push(Predicate::terms(
            schema::OCCURRENCE_ID,
            exclude.occurrence_ids.iter().cloned(),
        ));
    }
    if !exclude.taxon_ids.is_empty() {
        parts.push(Predicate::terms(
            schema::TAXON_ID,
            exclude.taxon_ids.iter().copied(),
        ));
    }
    if parts.is_empty() {
        None
    } else {
        Some(Predicate::any_of(parts))
    }
}

/// Expands the output block into a validated projection.
fn compile_projection(output: Option<&OutputFilter>) -> SightlineResult<Projection> {
    let mut projection = Projection::new();
    let output = match output {
        Some(output) => output,
        None => return Ok(projection),
    };
    if let Some(field_set) = &output.field_set {
        for path in field_set.preset_paths() {
            projection.include(path)?;
        }
    }
    for path in &output.fields {
        projection.include(path)?;
    }
    for path in &output.exclude_fields {
        projection.exclude(path)?;
    }
    Ok(projection)
}
