use super::GeographicsFilter;

/// Global sensitivity mode of a request.
///
/// `Public` is the default and the fail-closed fallback: only records with
/// `sensitive = false` are visible, and no sensitive-record branch is ever
/// built. `BothPublicAndSensitive` additionally opens the records a caller's
/// grants and identity reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProtectionFilter {
    #[default]
    Public,
    BothPublicAndSensitive,
}

/// One extended-authorization grant: an independent OR-branch opening
/// sensitive records up to a protection level, optionally fenced to a taxon
/// set and a geographic area.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaGrant {
    pub max_protection_level: i32,
    pub taxon_ids: Vec<i32>,
    pub geographic_area: Option<GeographicsFilter>,
}

/// Per-user authorization block of a search filter.
///
/// `user_id` is the caller's user-service identity; when present it opens
/// the caller's own records (reported by me, or observed by me with view
/// access) regardless of sensitivity. Grants each open an independent
/// sensitive-record branch. Without an identity and without grants the
/// request falls back to public-only visibility.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtendedAuthorizationFilter {
    pub user_id: Option<i64>,
    pub protection_filter: ProtectionFilter,
    pub grants: Vec<AreaGrant>,
}
