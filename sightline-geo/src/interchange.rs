//! WKT and GeoJSON interchange for the geometry model.
//!
//! The platform's wire formats carry geometries as GeoJSON objects or WKT
//! strings; internally everything is `geo_types`. These conversions are the
//! only place the crate touches either text format.

use std::str::FromStr;

use geo_types::Geometry;
use wkt::ToWkt;

use crate::error::{GeoError, GeoResult};

/// Parses a WKT string into a geometry.
pub fn parse_wkt(text: &str) -> GeoResult<Geometry<f64>> {
    wkt::Wkt::<f64>::from_str(text)
        .map_err(|e| GeoError::WktParse(format!("{:?}", e)))
        .and_then(|w| {
            w.try_into()
                .map_err(|e: wkt::conversion::Error| GeoError::WktParse(format!("{:?}", e)))
        })
}

/// Serializes a geometry as WKT.
pub fn to_wkt(geometry: &Geometry<f64>) -> String {
    geometry.wkt_string()
}

/// Converts a GeoJSON geometry object into a geometry.
pub fn from_geojson(geometry: &geojson::Geometry) -> GeoResult<Geometry<f64>> {
    Geometry::<f64>::try_from(geometry.value.clone())
        .map_err(|e| GeoError::GeoJson(e.to_string()))
}

/// Converts a geometry into a GeoJSON geometry object.
pub fn to_geojson(geometry: &Geometry<f64>) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(geometry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, Point};

    #[test]
    fn test_parse_wkt_point() {
        let g = parse_wkt("POINT(18.0686 59.3293)").unwrap();
        assert_eq!(g, Geometry::Point(Point::new(18.0686, 59.3293)));
    }

    #[test]
    fn test_parse_wkt_polygon() {
        let g = parse_wkt("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
        let Geometry::Polygon(p) = g else {
            panic!("expected polygon");
        };
        assert_eq!(p.exterior().0.len(), 5);
    }

    #[test]
    fn test_parse_wkt_rejects_garbage() {
        assert!(parse_wkt("PLYGON((0 0))").is_err());
        assert!(parse_wkt("").is_err());
    }

    #[test]
    fn test_wkt_round_trip() {
        let poly: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 4.0, y: 0.0),
            (x: 4.0, y: 4.0),
            (x: 0.0, y: 0.0),
        ]
        .into();
        let text = to_wkt(&poly);
        assert_eq!(parse_wkt(&text).unwrap(), poly);
    }

    #[test]
    fn test_geojson_round_trip() {
        let poly: Geometry<f64> = polygon![
            (x: 17.9, y: 59.2),
            (x: 18.2, y: 59.2),
            (x: 18.2, y: 59.4),
            (x: 17.9, y: 59.2),
        ]
        .into();
        let gj = to_geojson(&poly);
        assert_eq!(from_geojson(&gj).unwrap(), poly);
    }

    #[test]
    fn test_from_geojson_parses_raw_json() {
        let gj: geojson::Geometry = serde_json::from_str(
            r#"{"type": "Point", "coordinates": [18.0686, 59.3293]}"#,
        )
        .unwrap();
        let g = from_geojson(&gj).unwrap();
        assert_eq!(g, Geometry::Point(Point::new(18.0686, 59.3293)));
    }
}
