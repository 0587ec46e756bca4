//! The closed registry of supported coordinate reference systems.
//!
//! Every CRS the platform accepts is a variant of [`CoordinateSystem`]; the
//! discriminant is the EPSG code. Requests name a CRS with an EPSG code or a
//! well-known alias, parsed by [`CoordinateSystem::parse`]. Anything else is
//! rejected up front rather than deep inside a transform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

/// A coordinate reference system supported by the platform.
///
/// The set is closed. Adding a CRS means adding a variant here and a
/// projection definition in the transform pipeline, so an unsupported
/// system can never travel further than the parse step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum CoordinateSystem {
    /// World Geodetic System 1984, geographic (EPSG:4326).
    Wgs84 = 4326,
    /// SWEREF 99 geodetic, the Swedish realization of ETRS89 (EPSG:4619).
    Sweref99 = 4619,
    /// SWEREF 99 TM, transverse Mercator zone for all of Sweden (EPSG:3006).
    Sweref99Tm = 3006,
    /// RT90 2.5 gon V, the legacy Swedish grid (EPSG:3021).
    Rt90 = 3021,
    /// ETRS89 geodetic (EPSG:4258).
    Etrs89 = 4258,
    /// ETRS89-extended Lambert Azimuthal Equal Area, the EEA reference grid
    /// (EPSG:3035).
    Etrs89Laea = 3035,
    /// WGS 84 Pseudo-Mercator used by web map tiles (EPSG:3857).
    WebMercator = 3857,
}

/// The measurement unit of a coordinate system's axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsUnit {
    /// Geodetic degrees.
    Degree,
    /// Projected metres.
    Metre,
}

impl CoordinateSystem {
    /// All supported coordinate systems.
    pub const ALL: [CoordinateSystem; 7] = [
        CoordinateSystem::Wgs84,
        CoordinateSystem::Sweref99,
        CoordinateSystem::Sweref99Tm,
        CoordinateSystem::Rt90,
        CoordinateSystem::Etrs89,
        CoordinateSystem::Etrs89Laea,
        CoordinateSystem::WebMercator,
    ];

    /// Returns the EPSG code of this coordinate system.
    #[inline]
    pub fn srid(&self) -> i32 {
        *self as i32
    }

    /// Looks up a coordinate system by EPSG code.
    ///
    /// # Arguments
    ///
    /// * `srid` - EPSG code, e.g. `3006`
    ///
    /// # Returns
    ///
    /// The matching [`CoordinateSystem`], or [`GeoError::UnsupportedCrs`]
    /// if the code is not in the registry.
    pub fn from_srid(srid: i32) -> GeoResult<Self> {
        match srid {
            4326 => Ok(CoordinateSystem::Wgs84),
            4619 => Ok(CoordinateSystem::Sweref99),
            3006 => Ok(CoordinateSystem::Sweref99Tm),
            3021 => Ok(CoordinateSystem::Rt90),
            4258 => Ok(CoordinateSystem::Etrs89),
            3035 => Ok(CoordinateSystem::Etrs89Laea),
            // 900913 is the legacy unofficial code still sent by older clients.
            3857 | 900913 => Ok(CoordinateSystem::WebMercator),
            other => Err(GeoError::UnsupportedCrs(format!("epsg:{}", other))),
        }
    }

    /// Parses a coordinate system from an EPSG code or a well-known alias.
    ///
    /// Accepts `"epsg:<code>"`, a bare numeric code, or names such as
    /// `"wgs 84"`, `"sweref99tm"` and `"web mercator"`. Matching is
    /// case-insensitive and ignores spaces, dashes and underscores.
    pub fn parse(text: &str) -> GeoResult<Self> {
        let normalized: String = text
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();

        if let Some(code) = normalized.strip_prefix("epsg:") {
            let srid = code
                .parse::<i32>()
                .map_err(|_| GeoError::UnsupportedCrs(text.trim().to_string()))?;
            return Self::from_srid(srid);
        }
        if let Ok(srid) = normalized.parse::<i32>() {
            return Self::from_srid(srid);
        }

        match normalized.as_str() {
            "wgs84" => Ok(CoordinateSystem::Wgs84),
            "sweref99" => Ok(CoordinateSystem::Sweref99),
            "sweref99tm" => Ok(CoordinateSystem::Sweref99Tm),
            "rt90" | "rt902.5gonv" => Ok(CoordinateSystem::Rt90),
            "etrs89" => Ok(CoordinateSystem::Etrs89),
            "etrs89laea" | "laea" => Ok(CoordinateSystem::Etrs89Laea),
            "webmercator" | "pseudomercator" => Ok(CoordinateSystem::WebMercator),
            _ => Err(GeoError::UnsupportedCrs(text.trim().to_string())),
        }
    }

    /// Returns `true` if coordinates are geodetic longitude/latitude degrees.
    #[inline]
    pub fn is_geographic(&self) -> bool {
        matches!(
            self,
            CoordinateSystem::Wgs84 | CoordinateSystem::Sweref99 | CoordinateSystem::Etrs89
        )
    }

    /// The axis unit of this coordinate system.
    #[inline]
    pub fn unit(&self) -> CrsUnit {
        if self.is_geographic() {
            CrsUnit::Degree
        } else {
            CrsUnit::Metre
        }
    }

    /// Returns `true` if transformed output should be rounded to whole units.
    ///
    /// Projected systems carry metre axes where sub-metre precision is below
    /// the transform tolerance, so their outputs are rounded. Geodetic
    /// degrees are never rounded.
    #[inline]
    pub fn rounds_to_whole_units(&self) -> bool {
        !self.is_geographic()
    }

    /// Quantization step used when caching transformed points, expressed in
    /// the axis unit of this system.
    ///
    /// Points closer together than the step share a cache entry. The steps
    /// stay within the documented transform tolerance of roughly 1.5 metres:
    /// 1e-5 degrees is about 1.1 metres at the equator, and projected axes
    /// quantize to the metre.
    #[inline]
    pub fn cache_quantum(&self) -> f64 {
        match self.unit() {
            CrsUnit::Degree => 1e-5,
            CrsUnit::Metre => 1.0,
        }
    }

    /// Human-readable name, also the canonical alias accepted by [`parse`].
    ///
    /// [`parse`]: CoordinateSystem::parse
    pub fn name(&self) -> &'static str {
        match self {
            CoordinateSystem::Wgs84 => "WGS84",
            CoordinateSystem::Sweref99 => "SWEREF99",
            CoordinateSystem::Sweref99Tm => "SWEREF99TM",
            CoordinateSystem::Rt90 => "RT90",
            CoordinateSystem::Etrs89 => "ETRS89",
            CoordinateSystem::Etrs89Laea => "ETRS89-LAEA",
            CoordinateSystem::WebMercator => "WebMercator",
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (epsg:{})", self.name(), self.srid())
    }
}

impl FromStr for CoordinateSystem {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoordinateSystem::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srid_round_trip() {
        for crs in CoordinateSystem::ALL {
            assert_eq!(CoordinateSystem::from_srid(crs.srid()).unwrap(), crs);
        }
    }

    #[test]
    fn test_parse_epsg_codes() {
        assert_eq!(
            CoordinateSystem::parse("epsg:3006").unwrap(),
            CoordinateSystem::Sweref99Tm
        );
        assert_eq!(
            CoordinateSystem::parse("EPSG:4326").unwrap(),
            CoordinateSystem::Wgs84
        );
        assert_eq!(
            CoordinateSystem::parse("3857").unwrap(),
            CoordinateSystem::WebMercator
        );
        assert_eq!(
            CoordinateSystem::parse("epsg:900913").unwrap(),
            CoordinateSystem::WebMercator
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            CoordinateSystem::parse("wgs84").unwrap(),
            CoordinateSystem::Wgs84
        );
        assert_eq!(
            CoordinateSystem::parse("WGS 84").unwrap(),
            CoordinateSystem::Wgs84
        );
        assert_eq!(
            CoordinateSystem::parse("Sweref 99 TM").unwrap(),
            CoordinateSystem::Sweref99Tm
        );
        assert_eq!(
            CoordinateSystem::parse("sweref_99").unwrap(),
            CoordinateSystem::Sweref99
        );
        assert_eq!(
            CoordinateSystem::parse("RT90").unwrap(),
            CoordinateSystem::Rt90
        );
        assert_eq!(
            CoordinateSystem::parse("web mercator").unwrap(),
            CoordinateSystem::WebMercator
        );
        assert_eq!(
            CoordinateSystem::parse("ETRS89-LAEA").unwrap(),
            CoordinateSystem::Etrs89Laea
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(CoordinateSystem::parse("epsg:2154").is_err());
        assert!(CoordinateSystem::parse("lambert93").is_err());
        assert!(CoordinateSystem::parse("").is_err());
        assert!(CoordinateSystem::parse("epsg:abc").is_err());
    }

    #[test]
    fn test_geographic_classification() {
        assert!(CoordinateSystem::Wgs84.is_geographic());
        assert!(CoordinateSystem::Sweref99.is_geographic());
        assert!(CoordinateSystem::Etrs89.is_geographic());
        assert!(!CoordinateSystem::Sweref99Tm.is_geographic());
        assert!(!CoordinateSystem::Rt90.is_geographic());
        assert!(!CoordinateSystem::Etrs89Laea.is_geographic());
        assert!(!CoordinateSystem::WebMercator.is_geographic());
    }

    #[test]
    fn test_rounding_and_quantum_follow_unit() {
        for crs in CoordinateSystem::ALL {
            match crs.unit() {
                CrsUnit::Degree => {
                    assert!(!crs.rounds_to_whole_units());
                    assert_eq!(crs.cache_quantum(), 1e-5);
                }
                CrsUnit::Metre => {
                    assert!(crs.rounds_to_whole_units());
                    assert_eq!(crs.cache_quantum(), 1.0);
                }
            }
        }
    }

    #[test]
    fn test_display_contains_epsg_code() {
        assert_eq!(
            CoordinateSystem::Sweref99Tm.to_string(),
            "SWEREF99TM (epsg:3006)"
        );
    }
}
