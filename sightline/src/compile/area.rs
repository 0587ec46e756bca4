//! Geographic filter compilation.
//!
//! Input geometries arrive as GeoJSON in the coordinate system the filter
//! names (WGS84 when it names none) and are transformed to WGS84 before any
//! predicate is built. Malformed geometry never fails a request: it is
//! repaired best-effort and skipped only when no area survives the repair.

use geo_types::Geometry;
use sightline_geo::{
    from_geojson, to_geojson, CoordinateSystem, CrsTransformer, GeometryNormalizer,
};

use crate::errors::{ErrorKind, SightlineError, SightlineResult};
use crate::filter::{GeographicsFilter, LatLonBoundingBox};
use crate::predicate::{GeoPoint, Predicate, SpatialRelation};
use crate::schema;

/// Compiles the free-form geometry criteria of a filter.
///
/// Returns `Ok(None)` when no spatial criterion survives: an empty filter,
/// or one whose every geometry was skipped, contributes no predicate at
/// all. A named coordinate system that cannot be parsed and an inverted
/// bounding box are request errors.
pub(crate) fn compile_geographics(
    filter: &GeographicsFilter,
    transformer: &CrsTransformer,
    normalizer: &GeometryNormalizer,
) -> SightlineResult<Option<Predicate>> {
    if filter.is_empty() {
        return Ok(None);
    }

    let crs = match filter.coordinate_system.as_deref() {
        Some(name) => CoordinateSystem::parse(name)?,
        None => CoordinateSystem::Wgs84,
    };

    let mut parts: Vec<Predicate> = Vec::new();

    if let Some(bbox) = &filter.bounding_box {
        parts.push(bounding_box_predicate(bbox, filter)?);
    }

    let shapes: Vec<Predicate> = filter
        .geometries
        .iter()
        .filter_map(|raw| geometry_predicate(raw, crs, filter, transformer, normalizer))
        .collect();
    if !shapes.is_empty() {
        parts.push(Predicate::any_of(shapes));
    }

    match parts.len() {
        0 => Ok(None),
        1 => Ok(Some(parts.remove(0))),
        _ => Ok(Some(Predicate::all_of(parts))),
    }
}

fn bounding_box_predicate(
    bbox: &LatLonBoundingBox,
    filter: &GeographicsFilter,
) -> SightlineResult<Predicate> {
    if bbox.top_left.latitude <= bbox.bottom_right.latitude
        || bbox.top_left.longitude >= bbox.bottom_right.longitude
    {
        log::error!(
            "Bounding box corners are inverted: top left ({}, {}), bottom right ({}, {})",
            bbox.top_left.latitude,
            bbox.top_left.longitude,
            bbox.bottom_right.latitude,
            bbox.bottom_right.longitude
        );
        return Err(SightlineError::new(
            "Bounding box corners are inverted",
            ErrorKind::ValidationError,
        ));
    }

    let field = if filter.consider_observation_accuracy {
        schema::POINT_WITH_BUFFER
    } else {
        schema::POINT
    };
    let top_left = GeoPoint::new(bbox.top_left.longitude, bbox.top_left.latitude);
    let bottom_right = GeoPoint::new(bbox.bottom_right.longitude, bbox.bottom_right.latitude);

    let primary = Predicate::bounding_box(field, top_left, bottom_right);
    if filter.consider_disturbance_radius {
        // the disturbance-buffered point may be absent per record, so the
        // plain box must be tried as well
        let buffered = Predicate::bounding_box(
            schema::POINT_WITH_DISTURBANCE_BUFFER,
            top_left,
            bottom_right,
        );
        Ok(Predicate::any_of(vec![primary, buffered]))
    } else {
        Ok(primary)
    }
}

fn geometry_predicate(
    raw: &geojson::Geometry,
    crs: CoordinateSystem,
    filter: &GeographicsFilter,
    transformer: &CrsTransformer,
    normalizer: &GeometryNormalizer,
) -> Option<Predicate> {
    let parsed = match from_geojson(raw) {
        Ok(geometry) => geometry,
        Err(err) => {
            log::warn!("Skipping malformed input geometry: {}", err);
            return None;
        }
    };

    let geometry = if crs == CoordinateSystem::Wgs84 {
        parsed
    } else {
        match transformer.transform(&parsed, crs, CoordinateSystem::Wgs84) {
            Ok(geometry) => geometry,
            Err(err) => {
                log::warn!("Skipping geometry with no image in WGS84 from {}: {}", crs, err);
                return None;
            }
        }
    };

    match geometry {
        Geometry::Point(point) => {
            let distance = filter.max_distance_from_point?;
            if distance <= 0.0 {
                log::debug!("Ignoring point geometry without a positive search radius");
                return None;
            }
            Some(Predicate::geo_distance(
                schema::POINT_LOCATION,
                GeoPoint::new(point.x(), point.y()),
                distance,
            ))
        }
        shape @ (Geometry::Polygon(_) | Geometry::MultiPolygon(_)) => {
            let repaired = normalizer.make_valid(&shape);
            if !normalizer.is_usable(&repaired) {
                log::warn!("Skipping polygon that cannot be repaired to an area");
                return None;
            }
            Some(shape_predicate(&repaired, filter))
        }
        _ => {
            log::warn!("Skipping input geometry: only points and polygons match areas");
            None
        }
    }
}

fn shape_predicate(geometry: &Geometry<f64>, filter: &GeographicsFilter) -> Predicate {
    let shape = to_geojson(geometry);
    if filter.consider_observation_accuracy {
        Predicate::geo_shape(schema::POINT_WITH_BUFFER, shape, SpatialRelation::Intersects)
    } else {
        Predicate::geo_shape(schema::POINT, shape, SpatialRelation::Within)
    }
}
