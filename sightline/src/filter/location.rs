/// A latitude/longitude pair as the JSON contract spells it.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatLonCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A geographic bounding box given by its top-left and bottom-right corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatLonBoundingBox {
    pub top_left: LatLonCoordinate,
    pub bottom_right: LatLonCoordinate,
}

/// Administrative-area and named-location criteria of a search filter.
///
/// Feature ids are the platform's administrative-area identifiers, one list
/// per area type. `max_accuracy` caps the allowed coordinate uncertainty in
/// meters.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationFilter {
    pub county_ids: Vec<String>,
    pub municipality_ids: Vec<String>,
    pub parish_ids: Vec<String>,
    pub province_ids: Vec<String>,
    pub country_region_ids: Vec<String>,
    pub location_ids: Vec<String>,
    pub max_accuracy: Option<i32>,
}

impl LocationFilter {
    /// Checks whether the filter carries no criteria.
    pub fn is_empty(&self) -> bool {
        self.county_ids.is_empty()
            && self.municipality_ids.is_empty()
            && self.parish_ids.is_empty()
            && self.province_ids.is_empty()
            && self.country_region_ids.is_empty()
            && self.location_ids.is_empty()
            && self.max_accuracy.is_none()
    }
}

/// Free-form geometry criteria of a search filter.
///
/// Geometries are GeoJSON values in the coordinate system named by
/// `coordinate_system` (EPSG code or alias; WGS84 when absent); compilation
/// transforms them to WGS84 before predicates are built. The accuracy flag
/// matches against the accuracy-buffered point, the disturbance flag
/// additionally tries the disturbance-buffered point. `max_distance_from_point`
/// (meters) turns point geometries into distance predicates.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeographicsFilter {
    pub geometries: Vec<geojson::Geometry>,
    pub bounding_box: Option<LatLonBoundingBox>,
    pub consider_observation_accuracy: bool,
    pub consider_disturbance_radius: bool,
    pub max_distance_from_point: Option<f64>,
    pub coordinate_system: Option<String>,
}

impl GeographicsFilter {
    /// Checks whether the filter carries no spatial criteria at all.
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty() && self.bounding_box.is_none()
    }
}
