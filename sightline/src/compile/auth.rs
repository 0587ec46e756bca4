//! Authorization compilation.
//!
//! Sensitivity rules fail closed: without an authorization block, without a
//! usable identity and without grants, only public records (`sensitive =
//! false`) are visible. The `Public` mode returns before any sensitive
//! branch can be constructed, which also forces the generalization flag
//! off.

use sightline_geo::{CrsTransformer, GeometryNormalizer};

use super::area;
use crate::errors::SightlineResult;
use crate::filter::{AreaGrant, ExtendedAuthorizationFilter, ProtectionFilter};
use crate::predicate::Predicate;
use crate::schema;

/// The visibility predicate derived from a request's authorization block.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AccessPredicate {
    /// OR of every record population the caller may see.
    pub predicate: Predicate,
    /// Whether generalized (coarsened) positions of protected records may
    /// be shown alongside the real ones. Never true in `Public` mode.
    pub generalization_visible: bool,
}

/// Evaluates the authorization block into a visibility predicate.
pub(crate) fn evaluate(
    auth: Option<&ExtendedAuthorizationFilter>,
    transformer: &CrsTransformer,
    normalizer: &GeometryNormalizer,
) -> SightlineResult<AccessPredicate> {
    let public_only = Predicate::term(schema::SENSITIVE, false);

    let auth = match auth {
        Some(auth) => auth,
        None => {
            return Ok(AccessPredicate {
                predicate: public_only,
                generalization_visible: false,
            })
        }
    };

    if auth.protection_filter == ProtectionFilter::Public {
        return Ok(AccessPredicate {
            predicate: public_only,
            generalization_visible: false,
        });
    }

    let mut branches: Vec<Predicate> = vec![public_only];

    for grant in &auth.grants {
        branches.push(grant_branch(grant, transformer, normalizer)?);
    }

    if let Some(user_id) = auth.user_id {
        branches.push(Predicate::term(schema::REPORTED_BY_USER_ID, user_id));
        branches.push(Predicate::nested(
            schema::RECORDED_BY,
            Predicate::all_of(vec![
                Predicate::term(schema::RECORDED_BY_USER_ID, user_id),
                Predicate::term(schema::RECORDED_BY_VIEW_ACCESS, true),
            ]),
        ));
    }

    let generalization_visible = branches.len() > 1;
    Ok(AccessPredicate {
        predicate: Predicate::any_of(branches),
        generalization_visible,
    })
}

fn grant_branch(
    grant: &AreaGrant,
    transformer: &CrsTransformer,
    normalizer: &GeometryNormalizer,
) -> SightlineResult<Predicate> {
    let mut parts = vec![
        Predicate::term(schema::SENSITIVE, true),
        Predicate::at_most(schema::SENSITIVITY_CATEGORY, grant.max_protection_level),
    ];
    if !grant.taxon_ids.is_empty() {
        parts.push(Predicate::terms(schema::TAXON_ID, grant.taxon_ids.clone()));
    }
    if let Some(area) = &grant.geographic_area {
        if let Some(area_predicate) = area::compile_geographics(area, transformer, normalizer)? {
            parts.push(area_predicate);
        }
    }
    Ok(Predicate::all_of(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::GeographicsFilter;
    use crate::predicate::RangeBound;
    use once_cell::sync::Lazy;

    static TRANSFORMER: Lazy<CrsTransformer> =
        Lazy::new(|| CrsTransformer::new().expect("projection pipelines must build"));

    fn normalizer() -> GeometryNormalizer {
        GeometryNormalizer::new()
    }

    fn evaluate_auth(auth: Option<&ExtendedAuthorizationFilter>) -> AccessPredicate {
        evaluate(auth, &TRANSFORMER, &normalizer()).unwrap()
    }

    fn public_only() -> Predicate {
        Predicate::term(schema::SENSITIVE, false)
    }

    #[test]
    fn test_absent_block_fails_closed_to_public() {
        let access = evaluate_auth(None);
        assert_eq!(access.predicate, public_only());
        assert!(!access.generalization_visible);
    }

    #[test]
    fn test_public_mode_ignores_grants_and_identity() {
        let auth = ExtendedAuthorizationFilter {
            user_id: Some(4771),
            protection_filter: ProtectionFilter::Public,
            grants: vec![AreaGrant {
                max_protection_level: 5,
                ..AreaGrant::default()
            }],
        };
        let access = evaluate_auth(Some(&auth));
        assert_eq!(access.predicate, public_only());
        assert!(!access.generalization_visible);

        // no sensitive-record branch may exist anywhere in the tree
        let json = serde_json::to_string(&access.predicate).unwrap();
        assert!(!json.contains(schema::SENSITIVITY_CATEGORY));
    }

    #[test]
    fn test_both_mode_without_grants_or_identity_fails_closed() {
        let auth = ExtendedAuthorizationFilter {
            protection_filter: ProtectionFilter::BothPublicAndSensitive,
            ..ExtendedAuthorizationFilter::default()
        };
        let access = evaluate_auth(Some(&auth));
        assert_eq!(access.predicate, public_only());
        assert!(!access.generalization_visible);
    }

    #[test]
    fn test_grant_branch_caps_protection_level_and_taxa() {
        let auth = ExtendedAuthorizationFilter {
            protection_filter: ProtectionFilter::BothPublicAndSensitive,
            grants: vec![AreaGrant {
                max_protection_level: 2,
                taxon_ids: vec![7],
                geographic_area: None,
            }],
            ..ExtendedAuthorizationFilter::default()
        };
        let access = evaluate_auth(Some(&auth));
        assert!(access.generalization_visible);

        let expected_branch = Predicate::all_of(vec![
            Predicate::term(schema::SENSITIVE, true),
            Predicate::Range {
                field: schema::SENSITIVITY_CATEGORY.to_string(),
                lower: None,
                upper: Some(RangeBound::inclusive(2i32)),
            },
            Predicate::terms(schema::TAXON_ID, vec![7]),
        ]);
        assert_eq!(
            access.predicate,
            Predicate::any_of(vec![public_only(), expected_branch])
        );
    }

    #[test]
    fn test_grant_without_taxa_spans_all_taxa() {
        let auth = ExtendedAuthorizationFilter {
            protection_filter: ProtectionFilter::BothPublicAndSensitive,
            grants: vec![AreaGrant {
                max_protection_level: 3,
                ..AreaGrant::default()
            }],
            ..ExtendedAuthorizationFilter::default()
        };
        let access = evaluate_auth(Some(&auth));
        let json = serde_json::to_string(&access.predicate).unwrap();
        assert!(!json.contains(schema::TAXON_ID));
    }

    #[test]
    fn test_grant_area_joins_the_branch() {
        let square = geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![15.0, 62.0],
            vec![16.0, 62.0],
            vec![16.0, 63.0],
            vec![15.0, 63.0],
            vec![15.0, 62.0],
        ]]));
        let auth = ExtendedAuthorizationFilter {
            protection_filter: ProtectionFilter::BothPublicAndSensitive,
            grants: vec![AreaGrant {
                max_protection_level: 3,
                taxon_ids: vec![100077],
                geographic_area: Some(GeographicsFilter {
                    geometries: vec![square],
                    ..GeographicsFilter::default()
                }),
            }],
            ..ExtendedAuthorizationFilter::default()
        };
        let access = evaluate_auth(Some(&auth));
        let json = serde_json::to_string(&access.predicate).unwrap();
        assert!(json.contains("GeoShape"));
    }

    #[test]
    fn test_identity_opens_own_records() {
        let auth = ExtendedAuthorizationFilter {
            user_id: Some(4771),
            protection_filter: ProtectionFilter::BothPublicAndSensitive,
            ..ExtendedAuthorizationFilter::default()
        };
        let access = evaluate_auth(Some(&auth));
        assert!(access.generalization_visible);

        if let Predicate::Bool { should, .. } = &access.predicate {
            assert_eq!(should.len(), 3);
            assert_eq!(should[0], public_only());
            assert_eq!(
                should[1],
                Predicate::term(schema::REPORTED_BY_USER_ID, 4771i64)
            );
            assert_eq!(
                should[2],
                Predicate::nested(
                    schema::RECORDED_BY,
                    Predicate::all_of(vec![
                        Predicate::term(schema::RECORDED_BY_USER_ID, 4771i64),
                        Predicate::term(schema::RECORDED_BY_VIEW_ACCESS, true),
                    ]),
                )
            );
        } else {
            panic!("expected an OR of visibility branches");
        }
    }

    #[test]
    fn test_branch_order_is_public_grants_identity() {
        let auth = ExtendedAuthorizationFilter {
            user_id: Some(9),
            protection_filter: ProtectionFilter::BothPublicAndSensitive,
            grants: vec![AreaGrant {
                max_protection_level: 1,
                ..AreaGrant::default()
            }],
        };
        let access = evaluate_auth(Some(&auth));
        if let Predicate::Bool { should, .. } = &access.predicate {
            assert_eq!(should.len(), 4);
            assert_eq!(should[0], public_only());
            assert!(matches!(&should[3], Predicate::Nested { .. }));
        } else {
            panic!("expected an OR of visibility branches");
        }
    }
}
