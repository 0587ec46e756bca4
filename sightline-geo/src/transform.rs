//! Transforms points and geometries between registered coordinate systems.
//!
//! A [`CrsTransformer`] precomputes one pipeline per ordered pair of
//! coordinate systems when it is constructed, so a broken projection
//! definition fails loudly at startup instead of inside a request.
//! Transformed points are memoized in a tolerance-quantized cache shared
//! by all threads.

use std::collections::HashMap;

use dashmap::DashMap;
use geo::MapCoords;
use geo_types::{Coord, Geometry};

use crate::crs::CoordinateSystem;
use crate::error::{GeoError, GeoResult};
use crate::projection::Projection;

/// Default number of cached point transforms before the cache is dropped
/// wholesale and rebuilt from incoming traffic.
pub const DEFAULT_POINT_CACHE_CAPACITY: usize = 250_000;

/// Reference geodetic point used to validate pipelines at construction.
const PROBE_LON_DEG: f64 = 15.0;
const PROBE_LAT_DEG: f64 = 62.0;
const PROBE_TOLERANCE_DEG: f64 = 1e-6;

/// A source-to-target transform: invert the source projection to geodetic
/// degrees, then apply the target projection.
struct Pipeline {
    source: Projection,
    target: Projection,
    round_output: bool,
}

impl Pipeline {
    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let (lon, lat) = self.source.inverse(x, y);
        let (tx, ty) = self.target.forward(lon, lat);
        if self.round_output {
            (tx.round(), ty.round())
        } else {
            (tx, ty)
        }
    }
}

/// Cache key for a transformed point, quantized to the source system's
/// tolerance step so that near-identical inputs share one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey {
    from: CoordinateSystem,
    to: CoordinateSystem,
    qx: i64,
    qy: i64,
}

impl PointKey {
    fn new(from: CoordinateSystem, to: CoordinateSystem, x: f64, y: f64) -> Self {
        let quantum = from.cache_quantum();
        PointKey {
            from,
            to,
            qx: (x / quantum).round() as i64,
            qy: (y / quantum).round() as i64,
        }
    }
}

/// Transforms coordinates between the systems in the registry.
///
/// Construction builds and validates every pairwise pipeline. Transforming
/// between two systems with the same geodetic base, or where source and
/// target are equal, returns the input values untouched.
pub struct CrsTransformer {
    pipelines: HashMap<(CoordinateSystem, CoordinateSystem), Pipeline>,
    cache: DashMap<PointKey, (f64, f64)>,
    cache_capacity: usize,
}

impl CrsTransformer {
    /// Creates a transformer with the default point cache capacity.
    ///
    /// # Returns
    ///
    /// The transformer, or [`GeoError::Projection`] if any pipeline fails
    /// its construction-time probe.
    pub fn new() -> GeoResult<Self> {
        Self::with_cache_capacity(DEFAULT_POINT_CACHE_CAPACITY)
    }

    /// Creates a transformer with an explicit point cache capacity.
    pub fn with_cache_capacity(cache_capacity: usize) -> GeoResult<Self> {
        let mut pipelines = HashMap::new();
        for from in CoordinateSystem::ALL {
            for to in CoordinateSystem::ALL {
                if from == to {
                    continue;
                }
                pipelines.insert(
                    (from, to),
                    Pipeline {
                        source: Projection::for_crs(from),
                        target: Projection::for_crs(to),
                        round_output: to.rounds_to_whole_units(),
                    },
                );
            }
        }

        let transformer = CrsTransformer {
            pipelines,
            cache: DashMap::new(),
            cache_capacity,
        };
        transformer.validate_projections()?;
        log::debug!(
            "prepared {} coordinate transform pipelines",
            transformer.pipelines.len()
        );
        Ok(transformer)
    }

    /// Round-trips a reference point through every projection so that a
    /// bad definition surfaces at startup.
    fn validate_projections(&self) -> GeoResult<()> {
        for crs in CoordinateSystem::ALL {
            let projection = Projection::for_crs(crs);
            let (x, y) = projection.forward(PROBE_LON_DEG, PROBE_LAT_DEG);
            if !x.is_finite() || !y.is_finite() {
                return Err(GeoError::Projection(format!(
                    "projection for {} produced non-finite probe coordinates",
                    crs
                )));
            }
            let (lon, lat) = projection.inverse(x, y);
            if (lon - PROBE_LON_DEG).abs() > PROBE_TOLERANCE_DEG
                || (lat - PROBE_LAT_DEG).abs() > PROBE_TOLERANCE_DEG
            {
                log::error!(
                    "projection probe for {} diverged: ({}, {}) -> ({}, {})",
                    crs,
                    PROBE_LON_DEG,
                    PROBE_LAT_DEG,
                    lon,
                    lat
                );
                return Err(GeoError::Projection(format!(
                    "projection for {} failed its round-trip probe",
                    crs
                )));
            }
        }
        Ok(())
    }

    /// Transforms a single point.
    ///
    /// # Arguments
    ///
    /// * `x` - easting or longitude in the source system
    /// * `y` - northing or latitude in the source system
    /// * `from` - source coordinate system
    /// * `to` - target coordinate system
    ///
    /// # Returns
    ///
    /// The point in the target system. Outputs of projected targets are
    /// rounded to whole metres. When `from == to` the input is returned
    /// unchanged; the point is only retagged.
    pub fn transform_point(
        &self,
        x: f64,
        y: f64,
        from: CoordinateSystem,
        to: CoordinateSystem,
    ) -> GeoResult<(f64, f64)> {
        if from == to {
            return Ok((x, y));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(GeoError::InvalidGeometry(format!(
                "non-finite coordinate ({}, {})",
                x, y
            )));
        }

        let key = PointKey::new(from, to, x, y);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(*hit);
        }

        let pipeline = self
            .pipelines
            .get(&(from, to))
            .ok_or_else(|| GeoError::UnsupportedCrs(format!("{} -> {}", from, to)))?;
        let (tx, ty) = pipeline.apply(x, y);
        if !tx.is_finite() || !ty.is_finite() {
            return Err(GeoError::Projection(format!(
                "({}, {}) has no finite image in {}",
                x, y, to
            )));
        }

        if self.cache.len() >= self.cache_capacity {
            log::debug!(
                "point transform cache reached {} entries, clearing",
                self.cache.len()
            );
            self.cache.clear();
        }
        self.cache.insert(key, (tx, ty));
        Ok((tx, ty))
    }

    /// Transforms every coordinate of a geometry.
    ///
    /// The geometry's structure is preserved; only coordinate values
    /// change. `from == to` returns a clone.
    pub fn transform(
        &self,
        geometry: &Geometry<f64>,
        from: CoordinateSystem,
        to: CoordinateSystem,
    ) -> GeoResult<Geometry<f64>> {
        if from == to {
            return Ok(geometry.clone());
        }
        geometry.try_map_coords(|coord| {
            let (x, y) = self.transform_point(coord.x, coord.y, from, to)?;
            Ok(Coord { x, y })
        })
    }

    /// Number of points currently memoized.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops all memoized points.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::CoordsIter;
    use geo_types::{polygon, Geometry};

    fn transformer() -> CrsTransformer {
        CrsTransformer::new().unwrap()
    }

    #[test]
    fn test_construction_validates_all_pipelines() {
        let t = transformer();
        assert_eq!(t.pipelines.len(), 42);
        assert_eq!(t.cache_len(), 0);
    }

    #[test]
    fn test_same_crs_is_a_retag() {
        let t = transformer();
        let (x, y) = t
            .transform_point(18.0686, 59.3293, CoordinateSystem::Wgs84, CoordinateSystem::Wgs84)
            .unwrap();
        assert_eq!((x, y), (18.0686, 59.3293));
        assert_eq!(t.cache_len(), 0);
    }

    #[test]
    fn test_geodetic_base_systems_share_coordinates() {
        let t = transformer();
        for to in [CoordinateSystem::Sweref99, CoordinateSystem::Etrs89] {
            let (x, y) = t
                .transform_point(18.0686, 59.3293, CoordinateSystem::Wgs84, to)
                .unwrap();
            assert_eq!((x, y), (18.0686, 59.3293));
        }
    }

    #[test]
    fn test_projected_output_is_whole_metres() {
        let t = transformer();
        let (x, y) = t
            .transform_point(
                18.0686,
                59.3293,
                CoordinateSystem::Wgs84,
                CoordinateSystem::Sweref99Tm,
            )
            .unwrap();
        assert_eq!(x, x.round());
        assert_eq!(y, y.round());
        assert!((600_000.0..750_000.0).contains(&x), "easting: {}", x);
        assert!((6_500_000.0..6_650_000.0).contains(&y), "northing: {}", y);
    }

    #[test]
    fn test_geographic_output_is_not_rounded() {
        let t = transformer();
        let (lon, lat) = t
            .transform_point(
                674_000.0,
                6_580_000.0,
                CoordinateSystem::Sweref99Tm,
                CoordinateSystem::Wgs84,
            )
            .unwrap();
        assert!(lon.fract().abs() > 0.0);
        assert!(lat.fract().abs() > 0.0);
    }

    #[test]
    fn test_round_trip_through_projected_system() {
        let t = transformer();
        let (x, y) = t
            .transform_point(
                18.0686,
                59.3293,
                CoordinateSystem::Wgs84,
                CoordinateSystem::Sweref99Tm,
            )
            .unwrap();
        let (lon, lat) = t
            .transform_point(x, y, CoordinateSystem::Sweref99Tm, CoordinateSystem::Wgs84)
            .unwrap();
        // Metre rounding on the projected leg bounds the error.
        assert!((lon - 18.0686).abs() < 5e-5, "lon drift: {}", lon - 18.0686);
        assert!((lat - 59.3293).abs() < 5e-5, "lat drift: {}", lat - 59.3293);
    }

    #[test]
    fn test_round_trip_between_projected_systems() {
        let t = transformer();
        let (rx, ry) = t
            .transform_point(
                674_032.0,
                6_580_822.0,
                CoordinateSystem::Sweref99Tm,
                CoordinateSystem::Rt90,
            )
            .unwrap();
        let (x, y) = t
            .transform_point(rx, ry, CoordinateSystem::Rt90, CoordinateSystem::Sweref99Tm)
            .unwrap();
        assert!((x - 674_032.0).abs() <= 2.5, "easting drift: {}", x - 674_032.0);
        assert!((y - 6_580_822.0).abs() <= 2.5, "northing drift: {}", y - 6_580_822.0);
    }

    #[test]
    fn test_cache_hit_for_points_within_tolerance() {
        let t = transformer();
        let first = t
            .transform_point(
                18.000_000,
                59.000_000,
                CoordinateSystem::Wgs84,
                CoordinateSystem::Sweref99Tm,
            )
            .unwrap();
        let second = t
            .transform_point(
                18.000_001,
                59.000_001,
                CoordinateSystem::Wgs84,
                CoordinateSystem::Sweref99Tm,
            )
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(t.cache_len(), 1);
    }

    #[test]
    fn test_cache_clears_wholesale_at_capacity() {
        let t = CrsTransformer::with_cache_capacity(4).unwrap();
        for i in 0..4 {
            t.transform_point(
                11.0 + i as f64,
                58.0,
                CoordinateSystem::Wgs84,
                CoordinateSystem::Sweref99Tm,
            )
            .unwrap();
        }
        assert_eq!(t.cache_len(), 4);

        t.transform_point(
            16.0,
            58.0,
            CoordinateSystem::Wgs84,
            CoordinateSystem::Sweref99Tm,
        )
        .unwrap();
        assert_eq!(t.cache_len(), 1);
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let t = transformer();
        assert!(t
            .transform_point(
                f64::NAN,
                59.0,
                CoordinateSystem::Wgs84,
                CoordinateSystem::Sweref99Tm
            )
            .is_err());
        assert!(t
            .transform_point(
                18.0,
                f64::INFINITY,
                CoordinateSystem::Wgs84,
                CoordinateSystem::Rt90
            )
            .is_err());
    }

    #[test]
    fn test_geometry_transform_preserves_structure() {
        let t = transformer();
        let poly: Geometry<f64> = polygon![
            (x: 17.9, y: 59.2),
            (x: 18.2, y: 59.2),
            (x: 18.2, y: 59.4),
            (x: 17.9, y: 59.4),
            (x: 17.9, y: 59.2),
        ]
        .into();

        let projected = t
            .transform(&poly, CoordinateSystem::Wgs84, CoordinateSystem::Sweref99Tm)
            .unwrap();
        let Geometry::Polygon(p) = &projected else {
            panic!("expected a polygon, got {:?}", projected);
        };
        assert_eq!(p.exterior().0.len(), 5);
        for coord in &p.exterior().0 {
            assert_eq!(coord.x, coord.x.round());
            assert_eq!(coord.y, coord.y.round());
        }

        let restored = t
            .transform(&projected, CoordinateSystem::Sweref99Tm, CoordinateSystem::Wgs84)
            .unwrap();
        let Geometry::Polygon(r) = &restored else {
            panic!("expected a polygon, got {:?}", restored);
        };
        for (orig, back) in poly.coords_iter().zip(r.coords_iter()) {
            assert!((orig.x - back.x).abs() < 5e-5);
            assert!((orig.y - back.y).abs() < 5e-5);
        }
    }
}
