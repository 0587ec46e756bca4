/// Taxonomic criteria of a search filter.
///
/// Taxon ids are the platform's own taxon identifiers, already expanded to
/// include underlying taxa where the caller asked for that; red-list
/// categories are the category codes (`CR`, `EN`, `VU`, ...).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxonFilter {
    pub ids: Vec<i32>,
    pub red_list_categories: Vec<String>,
}

impl TaxonFilter {
    /// Checks whether the filter carries no criteria.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.red_list_categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(TaxonFilter::default().is_empty());
    }

    #[test]
    fn test_deserializes_camel_case_names() {
        let filter: TaxonFilter =
            serde_json::from_str(r#"{"ids":[100077],"redListCategories":["CR","EN"]}"#).unwrap();
        assert_eq!(filter.ids, vec![100077]);
        assert_eq!(filter.red_list_categories, vec!["CR", "EN"]);
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let filter: TaxonFilter = serde_json::from_str(r#"{"ids":[205]}"#).unwrap();
        assert!(filter.red_list_categories.is_empty());
    }
}
