use chrono::NaiveDateTime;
use indexmap::IndexMap;

use super::{ScriptParam, TermValue};

/// A longitude/latitude pair in the order the predicate contract uses.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        GeoPoint { lon, lat }
    }
}

/// Spatial relation tested by a [GeoShape](Predicate::GeoShape) leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SpatialRelation {
    /// The indexed geometry lies entirely inside the query shape.
    Within,
    /// The indexed geometry and the query shape overlap anywhere.
    Intersects,
}

/// One end of a [Range](Predicate::Range) predicate.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangeBound {
    pub value: TermValue,
    pub inclusive: bool,
}

impl RangeBound {
    /// Creates an inclusive bound (`>=` or `<=`).
    #[inline]
    pub fn inclusive(value: impl Into<TermValue>) -> Self {
        RangeBound {
            value: value.into(),
            inclusive: true,
        }
    }

    /// Creates an exclusive bound (`>` or `<`).
    #[inline]
    pub fn exclusive(value: impl Into<TermValue>) -> Self {
        RangeBound {
            value: value.into(),
            inclusive: false,
        }
    }
}

/// A backend-agnostic query predicate.
///
/// `Predicate` is the abstract syntax tree produced by compiling a search
/// filter. It carries no engine-specific detail; the execution layer walks
/// the tree and serializes it into its own wire format.
///
/// # Composition
///
/// Predicates combine through the [Bool](Predicate::Bool) node:
/// - `must` / `filter` - every child must match (`filter` children carry no
///   relevance scoring)
/// - `should` - at least one child must match, when the group is non-empty
/// - `must_not` - no child may match
///
/// "Match all" is encoded as the empty `Bool` node and "match nothing" as
/// `Bool { must_not: [match_all] }`. Group helpers special-case empty
/// collections explicitly: [Predicate::all_of] of nothing is match-nothing,
/// [Predicate::any_of] of nothing is match-all. Single-element groups
/// collapse to the element itself.
///
/// # Examples
///
/// ```rust,ignore
/// use sightline::predicate::Predicate;
///
/// let verified = Predicate::term("identification.verified", true);
/// let taxa = Predicate::terms("taxon.id", vec![100077i32, 101656]);
/// let combined = verified.and(taxa);
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Predicate {
    /// Matches records whose field equals a single scalar value.
    Term { field: String, value: TermValue },
    /// Matches records whose field equals any of the listed values.
    Terms { field: String, values: Vec<TermValue> },
    /// Matches records whose field lies between the optional bounds.
    Range {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lower: Option<RangeBound>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper: Option<RangeBound>,
    },
    /// Matches records whose date field lies inside the inclusive interval.
    DateRange {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<NaiveDateTime>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<NaiveDateTime>,
    },
    /// Matches records that carry the field at all.
    Exists { field: String },
    /// Matches records that do not carry the field.
    NotExists { field: String },
    /// Boolean combination of child predicates.
    Bool {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        must: Vec<Predicate>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        should: Vec<Predicate>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        must_not: Vec<Predicate>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        filter: Vec<Predicate>,
    },
    /// Applies the inner predicate to entries of a nested document array.
    Nested {
        path: String,
        predicate: Box<Predicate>,
    },
    /// Matches records whose point field lies within a distance of a point.
    GeoDistance {
        field: String,
        point: GeoPoint,
        distance_meters: f64,
    },
    /// Matches records whose geometry field relates to a GeoJSON shape.
    GeoShape {
        field: String,
        shape: geojson::Geometry,
        relation: SpatialRelation,
    },
    /// Matches records whose point field lies inside a bounding box.
    BoundingBox {
        field: String,
        top_left: GeoPoint,
        bottom_right: GeoPoint,
    },
    /// Matches records via a scripted test evaluated by the execution layer.
    Script {
        source: String,
        params: IndexMap<String, ScriptParam>,
    },
}

impl Predicate {
    /// Creates a term predicate matching a single scalar value.
    ///
    /// # Arguments
    ///
    /// * `field` - The dotted field path to test
    /// * `value` - The value the field must equal
    ///
    /// # Returns
    ///
    /// A new `Predicate::Term`.
    pub fn term(field: impl Into<String>, value: impl Into<TermValue>) -> Predicate {
        Predicate::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a terms predicate matching any of the listed values.
    ///
    /// # Arguments
    ///
    /// * `field` - The dotted field path to test
    /// * `values` - The candidate values, preserving their native type
    ///
    /// # Returns
    ///
    /// A new `Predicate::Terms`.
    pub fn terms<V>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Predicate
    where
        V: Into<TermValue>,
    {
        Predicate::Terms {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a range predicate with explicit bounds.
    pub fn range(
        field: impl Into<String>,
        lower: Option<RangeBound>,
        upper: Option<RangeBound>,
    ) -> Predicate {
        Predicate::Range {
            field: field.into(),
            lower,
            upper,
        }
    }

    /// Creates a range predicate matching `field <= value`.
    #[inline]
    pub fn at_most(field: impl Into<String>, value: impl Into<TermValue>) -> Predicate {
        Predicate::range(field, None, Some(RangeBound::inclusive(value)))
    }

    /// Creates a range predicate matching `field >= value`.
    #[inline]
    pub fn at_least(field: impl Into<String>, value: impl Into<TermValue>) -> Predicate {
        Predicate::range(field, Some(RangeBound::inclusive(value)), None)
    }

    /// Creates an inclusive date-range predicate. Either end may be open.
    pub fn date_range(
        field: impl Into<String>,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Predicate {
        Predicate::DateRange {
            field: field.into(),
            from,
            to,
        }
    }

    /// Creates an exists predicate.
    #[inline]
    pub fn exists(field: impl Into<String>) -> Predicate {
        Predicate::Exists {
            field: field.into(),
        }
    }

    /// Creates a not-exists predicate.
    #[inline]
    pub fn not_exists(field: impl Into<String>) -> Predicate {
        Predicate::NotExists {
            field: field.into(),
        }
    }

    /// Creates a nested predicate applying `predicate` to entries of the
    /// nested document array at `path`.
    pub fn nested(path: impl Into<String>, predicate: Predicate) -> Predicate {
        Predicate::Nested {
            path: path.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Creates a geo-distance predicate.
    ///
    /// # Arguments
    ///
    /// * `field` - The indexed point field
    /// * `point` - Center of the search circle, WGS84 lon/lat
    /// * `distance_meters` - Radius of the search circle in meters
    pub fn geo_distance(
        field: impl Into<String>,
        point: GeoPoint,
        distance_meters: f64,
    ) -> Predicate {
        Predicate::GeoDistance {
            field: field.into(),
            point,
            distance_meters,
        }
    }

    /// Creates a geo-shape predicate against a GeoJSON geometry.
    pub fn geo_shape(
        field: impl Into<String>,
        shape: geojson::Geometry,
        relation: SpatialRelation,
    ) -> Predicate {
        Predicate::GeoShape {
            field: field.into(),
            shape,
            relation,
        }
    }

    /// Creates a bounding-box predicate.
    pub fn bounding_box(
        field: impl Into<String>,
        top_left: GeoPoint,
        bottom_right: GeoPoint,
    ) -> Predicate {
        Predicate::BoundingBox {
            field: field.into(),
            top_left,
            bottom_right,
        }
    }

    /// Creates a script predicate with typed parameters.
    pub fn script(source: impl Into<String>, params: IndexMap<String, ScriptParam>) -> Predicate {
        Predicate::Script {
            source: source.into(),
            params,
        }
    }

    /// Creates a predicate that matches every record.
    #[inline]
    pub fn match_all() -> Predicate {
        Predicate::Bool {
            must: Vec::new(),
            should: Vec::new(),
            must_not: Vec::new(),
            filter: Vec::new(),
        }
    }

    /// Creates a predicate that matches no record.
    #[inline]
    pub fn match_none() -> Predicate {
        Predicate::Bool {
            must: Vec::new(),
            should: Vec::new(),
            must_not: vec![Predicate::match_all()],
            filter: Vec::new(),
        }
    }

    /// Combines predicates so that every one must match.
    ///
    /// An empty collection is match-nothing: a conjunction that lost all of
    /// its branches must never widen into an unconstrained query. A
    /// single-element collection collapses to the element itself.
    pub fn all_of(predicates: Vec<Predicate>) -> Predicate {
        let mut predicates = predicates;
        match predicates.len() {
            0 => Predicate::match_none(),
            1 => predicates.remove(0),
            _ => Predicate::Bool {
                must: Vec::new(),
                should: Vec::new(),
                must_not: Vec::new(),
                filter: predicates,
            },
        }
    }

    /// Combines predicates so that at least one must match.
    ///
    /// An empty collection is match-all: a disjunction with no alternatives
    /// imposes no constraint. A single-element collection collapses to the
    /// element itself.
    pub fn any_of(predicates: Vec<Predicate>) -> Predicate {
        let mut predicates = predicates;
        match predicates.len() {
            0 => Predicate::match_all(),
            1 => predicates.remove(0),
            _ => Predicate::Bool {
                must: Vec::new(),
                should: predicates,
                must_not: Vec::new(),
                filter: Vec::new(),
            },
        }
    }

    /// Combines this predicate with another so that both must match.
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::all_of(vec![self, other])
    }

    /// Combines this predicate with another so that either may match.
    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::any_of(vec![self, other])
    }

    /// Checks whether this predicate is the match-all encoding.
    pub fn is_match_all(&self) -> bool {
        matches!(
            self,
            Predicate::Bool {
                must,
                should,
                must_not,
                filter,
            } if must.is_empty() && should.is_empty() && must_not.is_empty() && filter.is_empty()
        )
    }

    /// Checks whether this predicate is the match-nothing encoding.
    pub fn is_match_none(&self) -> bool {
        match self {
            Predicate::Bool {
                must,
                should,
                must_not,
                filter,
            } => {
                must.is_empty()
                    && should.is_empty()
                    && filter.is_empty()
                    && must_not.len() == 1
                    && must_not[0].is_match_all()
            }
            _ => false,
        }
    }
}
