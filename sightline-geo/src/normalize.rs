//! Geometry repair and derived-geometry construction.
//!
//! Free-form geometries arrive from clients in every state of disrepair:
//! unclosed rings, repeated points, self-intersections. [`GeometryNormalizer`]
//! repairs what it can and never panics on bad input. It also builds the
//! derived geometries the platform needs: buffered circles around points,
//! convex hulls, and Delaunay-based concave hulls.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use geo::{unary_union, BooleanOps, ConvexHull, CoordsIter};
use geo_types::{Coord, Geometry, LineString, MultiPoint, MultiPolygon, Point, Polygon};
use spade::handles::{FixedFaceHandle, FixedUndirectedEdgeHandle, InnerTag};
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::crs::{CoordinateSystem, CrsUnit};
use crate::error::{GeoError, GeoResult};

/// Metres per degree of latitude, also of longitude at the equator.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Vertex counts for buffered circles by radius band.
const CIRCLE_VERTICES_SMALL: usize = 32;
const CIRCLE_VERTICES_MEDIUM: usize = 64;
const CIRCLE_VERTICES_LARGE: usize = 128;

type Dt = DelaunayTriangulation<Point2<f64>>;
type FixedFace = FixedFaceHandle<InnerTag>;

/// Border-edge erosion limit for concave hulls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeLimit {
    /// Erode border edges longer than this many axis units.
    MaxLength(f64),
    /// Erode border edges longer than `min + ratio * (max - min)` of the
    /// triangulation's edge lengths. A ratio of 0 erodes hardest; a ratio
    /// of 1 keeps the convex hull.
    LengthRatio(f64),
}

/// Repairs input geometries and builds derived ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryNormalizer;

impl GeometryNormalizer {
    pub fn new() -> Self {
        GeometryNormalizer
    }

    /// Repairs a geometry as far as it can be repaired.
    ///
    /// Polygon rings are deduplicated and closed, then self-intersections
    /// are resolved by a self-union, which may split one polygon into
    /// several. Multi-polygons are repaired member by member, dropping
    /// members that cannot be repaired. Non-areal geometries pass through
    /// unchanged.
    ///
    /// This never fails: if nothing repairable remains, the input is
    /// returned as-is. Callers decide what to do with a geometry that is
    /// still degenerate, see [`GeometryNormalizer::is_usable`].
    pub fn make_valid(&self, geometry: &Geometry<f64>) -> Geometry<f64> {
        match geometry {
            Geometry::Polygon(polygon) => match repair_polygon(polygon) {
                Some(mut repaired) => {
                    if repaired.0.len() == 1 {
                        Geometry::Polygon(repaired.0.remove(0))
                    } else {
                        Geometry::MultiPolygon(repaired)
                    }
                }
                None => geometry.clone(),
            },
            Geometry::MultiPolygon(multi) => {
                let mut members: Vec<Polygon<f64>> = Vec::with_capacity(multi.0.len());
                for polygon in &multi.0 {
                    if let Some(repaired) = repair_polygon(polygon) {
                        members.extend(repaired.0);
                    }
                }
                if members.is_empty() {
                    geometry.clone()
                } else {
                    Geometry::MultiPolygon(MultiPolygon(members))
                }
            }
            other => other.clone(),
        }
    }

    /// Returns `true` if the geometry can anchor an area predicate.
    ///
    /// Areal geometries need at least three distinct exterior points, lines
    /// at least two. Everything a repair could salvage has been salvaged by
    /// the time this is asked.
    pub fn is_usable(&self, geometry: &Geometry<f64>) -> bool {
        match geometry {
            Geometry::Point(p) => p.x().is_finite() && p.y().is_finite(),
            Geometry::MultiPoint(mp) => mp.0.iter().any(|p| p.x().is_finite() && p.y().is_finite()),
            Geometry::Polygon(p) => distinct_ring_points(p.exterior()) >= 3,
            Geometry::MultiPolygon(mp) => {
                mp.0.iter().any(|p| distinct_ring_points(p.exterior()) >= 3)
            }
            Geometry::LineString(ls) => finite_line_points(ls) >= 2,
            Geometry::MultiLineString(mls) => {
                mls.0.iter().any(|ls| finite_line_points(ls) >= 2)
            }
            Geometry::GeometryCollection(gc) => gc.0.iter().any(|g| self.is_usable(g)),
            Geometry::Line(_) | Geometry::Triangle(_) | Geometry::Rect(_) => true,
        }
    }

    /// Builds a circular polygon of `radius_meters` around a point.
    ///
    /// The vertex count scales with the radius so small buffers stay cheap
    /// and large ones stay round: 32 vertices under 1 km, 64 under 10 km,
    /// 128 beyond. In geographic systems the radius is converted to degree
    /// axes at the centre's latitude, producing an ellipse in degree space
    /// that is circular on the ground.
    pub fn circle(
        &self,
        center: Point<f64>,
        radius_meters: f64,
        crs: CoordinateSystem,
    ) -> GeoResult<Polygon<f64>> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(GeoError::InvalidGeometry(format!(
                "circle radius must be positive, got {}",
                radius_meters
            )));
        }
        if !center.x().is_finite() || !center.y().is_finite() {
            return Err(GeoError::InvalidGeometry(
                "circle centre has non-finite coordinates".to_string(),
            ));
        }

        let (radius_x, radius_y) = match crs.unit() {
            CrsUnit::Metre => (radius_meters, radius_meters),
            CrsUnit::Degree => meters_to_degree_axes(radius_meters, center.y()),
        };

        let count = circle_vertex_count(radius_meters);
        let mut coords = Vec::with_capacity(count + 1);
        for i in 0..count {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / count as f64;
            coords.push(Coord {
                x: center.x() + radius_x * theta.cos(),
                y: center.y() + radius_y * theta.sin(),
            });
        }
        coords.push(coords[0]);
        Ok(Polygon::new(LineString::new(coords), Vec::new()))
    }

    /// Convex hull of every point in the given geometries.
    pub fn convex_hull(&self, geometries: &[Geometry<f64>]) -> GeoResult<Polygon<f64>> {
        let points = collect_distinct_points(geometries);
        if points.len() < 3 {
            return Err(GeoError::InvalidGeometry(format!(
                "convex hull needs at least 3 distinct points, got {}",
                points.len()
            )));
        }
        let hull = MultiPoint::new(points).convex_hull();
        if distinct_ring_points(hull.exterior()) < 3 {
            return Err(GeoError::InvalidGeometry(
                "points are collinear".to_string(),
            ));
        }
        Ok(hull)
    }

    /// Concave hull of every point in the given geometries.
    ///
    /// Builds a Delaunay triangulation and erodes triangles from the border
    /// inward wherever a border edge exceeds the limit, keeping the boundary
    /// simple. With `allow_holes`, interior pockets of long edges are carved
    /// out as well, yielding polygons with interior rings.
    pub fn concave_hull(
        &self,
        geometries: &[Geometry<f64>],
        limit: EdgeLimit,
        allow_holes: bool,
    ) -> GeoResult<Geometry<f64>> {
        let points = collect_distinct_points(geometries);
        if points.len() < 3 {
            return Err(GeoError::InvalidGeometry(format!(
                "concave hull needs at least 3 distinct points, got {}",
                points.len()
            )));
        }

        let vertices: Vec<Point2<f64>> = points.iter().map(|p| Point2::new(p.x(), p.y())).collect();
        let triangulation = Dt::bulk_load(vertices)
            .map_err(|e| GeoError::InvalidGeometry(format!("triangulation failed: {:?}", e)))?;
        if triangulation.num_inner_faces() == 0 {
            return Err(GeoError::InvalidGeometry(
                "points are collinear".to_string(),
            ));
        }

        let threshold = resolve_edge_threshold(&triangulation, limit)?;
        let removed = erode(&triangulation, threshold, allow_holes);

        let kept: Vec<Polygon<f64>> = triangulation
            .inner_faces()
            .filter(|face| !removed.contains(&face.fix()))
            .map(|face| {
                let [a, b, c] = face.vertices().map(|v| v.position());
                Polygon::new(
                    LineString::new(vec![
                        Coord { x: a.x, y: a.y },
                        Coord { x: b.x, y: b.y },
                        Coord { x: c.x, y: c.y },
                        Coord { x: a.x, y: a.y },
                    ]),
                    Vec::new(),
                )
            })
            .collect();
        if kept.is_empty() {
            return Err(GeoError::InvalidGeometry(
                "erosion left no faces".to_string(),
            ));
        }

        let mut merged = unary_union(&kept);
        if !allow_holes {
            merged = MultiPolygon(
                merged
                    .0
                    .into_iter()
                    .map(|p| Polygon::new(p.into_inner().0, Vec::new()))
                    .collect(),
            );
        }
        if merged.0.len() == 1 {
            Ok(Geometry::Polygon(merged.0.remove(0)))
        } else {
            Ok(Geometry::MultiPolygon(merged))
        }
    }
}

/// Number of circle vertices for a radius in metres.
#[inline]
pub fn circle_vertex_count(radius_meters: f64) -> usize {
    if radius_meters < 1_000.0 {
        CIRCLE_VERTICES_SMALL
    } else if radius_meters < 10_000.0 {
        CIRCLE_VERTICES_MEDIUM
    } else {
        CIRCLE_VERTICES_LARGE
    }
}

/// Counts distinct positions on a ring, ignoring the closing duplicate.
pub fn distinct_ring_points(ring: &LineString<f64>) -> usize {
    let mut coords: &[Coord<f64>] = &ring.0;
    if coords.len() > 1 && coords.first() == coords.last() {
        coords = &coords[..coords.len() - 1];
    }
    let mut seen = HashSet::with_capacity(coords.len());
    for c in coords {
        seen.insert((c.x.to_bits(), c.y.to_bits()));
    }
    seen.len()
}

fn finite_line_points(line: &LineString<f64>) -> usize {
    line.coords_iter()
        .filter(|c| c.x.is_finite() && c.y.is_finite())
        .count()
}

fn meters_to_degree_axes(radius_meters: f64, latitude: f64) -> (f64, f64) {
    let radius_lat = radius_meters / METERS_PER_DEGREE;
    let cos_lat = latitude.to_radians().cos().abs().max(1e-6);
    (radius_meters / (METERS_PER_DEGREE * cos_lat), radius_lat)
}

/// Dedups and closes a ring. Returns `None` if fewer than 3 distinct
/// positions remain.
fn clean_ring(ring: &LineString<f64>) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for c in &ring.0 {
        if !c.x.is_finite() || !c.y.is_finite() {
            continue;
        }
        if coords.last() != Some(c) {
            coords.push(*c);
        }
    }
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    let mut seen = HashSet::with_capacity(coords.len());
    for c in &coords {
        seen.insert((c.x.to_bits(), c.y.to_bits()));
    }
    if seen.len() < 3 {
        return None;
    }
    let mut ring = LineString::new(coords);
    ring.close();
    Some(ring)
}

/// Repairs one polygon. The self-union resolves self-intersections the way
/// a zero-width buffer does, possibly splitting the polygon.
fn repair_polygon(polygon: &Polygon<f64>) -> Option<MultiPolygon<f64>> {
    let exterior = clean_ring(polygon.exterior())?;
    let interiors: Vec<LineString<f64>> = polygon
        .interiors()
        .iter()
        .filter_map(clean_ring)
        .collect();
    let cleaned = Polygon::new(exterior, interiors);

    let unioned = cleaned.union(&cleaned);
    if unioned.0.is_empty() {
        // Zero-area input; the cleaned ring is the best repair available.
        Some(MultiPolygon(vec![cleaned]))
    } else {
        Some(unioned)
    }
}

fn collect_distinct_points(geometries: &[Geometry<f64>]) -> Vec<Point<f64>> {
    let mut seen = HashSet::new();
    let mut points = Vec::new();
    for geometry in geometries {
        for coord in geometry.coords_iter() {
            if !coord.x.is_finite() || !coord.y.is_finite() {
                continue;
            }
            if seen.insert((coord.x.to_bits(), coord.y.to_bits())) {
                points.push(Point::new(coord.x, coord.y));
            }
        }
    }
    points
}

fn edge_length(triangulation: &Dt, edge: FixedUndirectedEdgeHandle) -> f64 {
    let [a, b] = triangulation.undirected_edge(edge).vertices();
    let (pa, pb) = (a.position(), b.position());
    (pa.x - pb.x).hypot(pa.y - pb.y)
}

fn resolve_edge_threshold(triangulation: &Dt, limit: EdgeLimit) -> GeoResult<f64> {
    match limit {
        EdgeLimit::MaxLength(length) => {
            if !length.is_finite() || length < 0.0 {
                return Err(GeoError::InvalidGeometry(format!(
                    "edge length limit must be non-negative, got {}",
                    length
                )));
            }
            Ok(length)
        }
        EdgeLimit::LengthRatio(ratio) => {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(GeoError::InvalidGeometry(format!(
                    "edge length ratio must be within [0, 1], got {}",
                    ratio
                )));
            }
            let mut min = f64::MAX;
            let mut max = f64::MIN;
            for edge in triangulation.undirected_edges() {
                let length = edge_length(triangulation, edge.fix());
                min = min.min(length);
                max = max.max(length);
            }
            Ok(min + ratio * (max - min))
        }
    }
}

/// Candidate border edge, ordered by length for the erosion heap.
struct BorderEdge {
    length: f64,
    edge: FixedUndirectedEdgeHandle,
}

impl PartialEq for BorderEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BorderEdge {}

impl PartialOrd for BorderEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BorderEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .partial_cmp(&other.length)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.edge.index().cmp(&other.edge.index()))
    }
}

/// Erosion state shared between the outer border and carved holes.
struct Erosion {
    removed: HashSet<FixedFace>,
    border: HashSet<FixedUndirectedEdgeHandle>,
    border_vertices: HashSet<usize>,
    heap: BinaryHeap<BorderEdge>,
}

/// Erodes the triangulation border wherever an edge exceeds the threshold
/// and returns the set of removed faces.
fn erode(triangulation: &Dt, threshold: f64, allow_holes: bool) -> HashSet<FixedFace> {
    let mut state = Erosion {
        removed: HashSet::new(),
        border: HashSet::new(),
        border_vertices: HashSet::new(),
        heap: BinaryHeap::new(),
    };

    for edge in triangulation.convex_hull() {
        let fixed = edge.as_undirected().fix();
        state.border.insert(fixed);
        state.heap.push(BorderEdge {
            length: edge_length(triangulation, fixed),
            edge: fixed,
        });
        for vertex in edge.as_undirected().vertices() {
            state.border_vertices.insert(vertex.index());
        }
    }

    erode_pending(triangulation, threshold, &mut state);

    if allow_holes {
        while let Some(seed) = find_hole_seed(triangulation, threshold, &state) {
            carve_face(triangulation, seed, &mut state);
            erode_pending(triangulation, threshold, &mut state);
        }
    }

    state.removed
}

/// Pops border edges longest-first and erodes their interior face while the
/// edge is over the threshold and removal keeps the boundary simple.
fn erode_pending(triangulation: &Dt, threshold: f64, state: &mut Erosion) {
    while let Some(candidate) = state.heap.pop() {
        if candidate.length <= threshold {
            // Max-heap: everything left is at most this long.
            break;
        }
        if !state.border.contains(&candidate.edge) {
            continue;
        }

        let edge = triangulation.undirected_edge(candidate.edge);
        let directed = edge.as_directed();
        let mut interior = None;
        for face in [directed.face(), directed.rev().face()] {
            if let Some(inner) = face.as_inner() {
                if !state.removed.contains(&inner.fix()) {
                    interior = Some(inner);
                    break;
                }
            }
        }
        let Some(face) = interior else {
            continue;
        };

        let [a, b] = edge.vertices();
        let Some(opposite) = face
            .vertices()
            .into_iter()
            .find(|v| v.index() != a.index() && v.index() != b.index())
        else {
            continue;
        };
        // Removing the face would pinch the boundary at a vertex it
        // already passes through.
        if state.border_vertices.contains(&opposite.index()) {
            continue;
        }

        state.removed.insert(face.fix());
        state.border.remove(&candidate.edge);
        state.border_vertices.insert(opposite.index());
        for adjacent in face.adjacent_edges() {
            let fixed = adjacent.as_undirected().fix();
            if fixed == candidate.edge {
                continue;
            }
            state.border.insert(fixed);
            state.heap.push(BorderEdge {
                length: edge_length(triangulation, fixed),
                edge: fixed,
            });
        }
    }
}

/// Finds a kept face strictly inside the hull whose longest edge exceeds
/// the threshold, to seed a hole.
fn find_hole_seed(triangulation: &Dt, threshold: f64, state: &Erosion) -> Option<FixedFace> {
    let mut best: Option<(f64, FixedFace)> = None;
    for face in triangulation.inner_faces() {
        if state.removed.contains(&face.fix()) {
            continue;
        }
        if face
            .vertices()
            .iter()
            .any(|v| state.border_vertices.contains(&v.index()))
        {
            continue;
        }
        let mut longest = 0.0_f64;
        let mut detached = true;
        for edge in face.adjacent_edges() {
            let undirected = edge.as_undirected().fix();
            if state.border.contains(&undirected) {
                detached = false;
                break;
            }
            let mut neighbour = None;
            for side in [edge.face(), edge.rev().face()] {
                if let Some(inner) = side.as_inner() {
                    if inner.fix() != face.fix() {
                        neighbour = Some(inner.fix());
                    }
                }
            }
            match neighbour {
                Some(n) if !state.removed.contains(&n) => {
                    longest = longest.max(edge_length(triangulation, undirected));
                }
                _ => {
                    detached = false;
                    break;
                }
            }
        }
        if !detached || longest <= threshold {
            continue;
        }
        if best.map_or(true, |(len, _)| longest > len) {
            best = Some((longest, face.fix()));
        }
    }
    best.map(|(_, face)| face)
}

/// Removes one interior face outright, turning its edges into border that
/// the next erosion pass can widen into a hole.
fn carve_face(triangulation: &Dt, seed: FixedFace, state: &mut Erosion) {
    let face = triangulation.face(seed);
    state.removed.insert(seed);
    for vertex in face.vertices() {
        state.border_vertices.insert(vertex.index());
    }
    for edge in face.adjacent_edges() {
        let fixed = edge.as_undirected().fix();
        state.border.insert(fixed);
        state.heap.push(BorderEdge {
            length: edge_length(triangulation, fixed),
            edge: fixed,
        });
    }
}
