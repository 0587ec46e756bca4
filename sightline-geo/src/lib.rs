//! # Sightline Geo - Geospatial Support for Sightline Search
//!
//! This crate carries the geospatial groundwork under the Sightline query
//! compiler: coordinate reference system transforms and geometry repair for
//! the observation search platform.
//!
//! ## Features
//!
//! - **Closed CRS Registry**: Seven coordinate systems, parsed from EPSG
//!   codes or well-known aliases, rejected anywhere else
//! - **Precomputed Pipelines**: Every pairwise transform is built and
//!   probed at startup, so a broken definition cannot reach a request
//! - **Tolerance-Quantized Cache**: Transformed points are memoized at
//!   the platform's metre-level tolerance and dropped wholesale at capacity
//! - **Geometry Repair**: `make_valid` fixes rings and self-intersections
//!   without ever panicking on client input
//! - **Derived Geometries**: Radius-scaled circles, convex hulls, and
//!   Delaunay-based concave hulls with optional holes
//! - **Interchange**: WKT and GeoJSON conversions for the wire formats
//!
//! ## Quick Start
//!
//! ```rust
//! use sightline_geo::{CoordinateSystem, CrsTransformer, GeometryNormalizer};
//! use geo_types::{Geometry, Point};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transformer = CrsTransformer::new()?;
//! let (east, north) = transformer.transform_point(
//!     18.0686,
//!     59.3293,
//!     CoordinateSystem::Wgs84,
//!     CoordinateSystem::Sweref99Tm,
//! )?;
//! assert_eq!(east, east.round());
//!
//! let normalizer = GeometryNormalizer::new();
//! let circle = normalizer.circle(
//!     Point::new(18.0686, 59.3293),
//!     500.0,
//!     CoordinateSystem::Wgs84,
//! )?;
//! assert!(normalizer.is_usable(&Geometry::Polygon(circle)));
//! # Ok(())
//! # }
//! ```

// Coordinate system modules
pub mod crs;
pub mod transform;

mod projection;

// Geometry modules
pub mod interchange;
pub mod normalize;

pub mod error;

// Re-export the primary types
pub use crs::{CoordinateSystem, CrsUnit};
pub use error::{GeoError, GeoResult};
pub use interchange::{from_geojson, parse_wkt, to_geojson, to_wkt};
pub use normalize::{circle_vertex_count, distinct_ring_points, EdgeLimit, GeometryNormalizer};
pub use transform::{CrsTransformer, DEFAULT_POINT_CACHE_CAPACITY};
