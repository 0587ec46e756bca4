use indexmap::IndexSet;

use crate::errors::{ErrorKind, SightlineError, SightlineResult};
use crate::schema;

/// Ordered, de-duplicated field projection for compiled queries.
///
/// A projection carries two dotted-path lists: fields to include in the
/// result documents and fields to strip from them. Paths keep their
/// insertion order and are validated against the static field schema when
/// added, so a typo fails the compilation instead of silently widening or
/// narrowing the output.
///
/// An empty projection means "return everything".
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Projection {
    includes: IndexSet<String>,
    excludes: IndexSet<String>,
}

impl Projection {
    /// Creates an empty projection.
    pub fn new() -> Self {
        Projection::default()
    }

    /// Adds a field path to the include list.
    ///
    /// # Arguments
    ///
    /// * `path` - A dotted field path; either a schema leaf or a subtree
    ///   prefix such as `taxon`
    ///
    /// # Returns
    ///
    /// An error of kind [ErrorKind::InvalidFieldName] if the path is not in
    /// the schema.
    pub fn include(&mut self, path: &str) -> SightlineResult<&mut Self> {
        self.validate(path)?;
        self.includes.insert(path.to_string());
        Ok(self)
    }

    /// Adds a field path to the exclude list.
    pub fn exclude(&mut self, path: &str) -> SightlineResult<&mut Self> {
        self.validate(path)?;
        self.excludes.insert(path.to_string());
        Ok(self)
    }

    fn validate(&self, path: &str) -> SightlineResult<()> {
        if schema::is_valid_path(path) {
            Ok(())
        } else {
            log::error!("Unknown field path {} in projection", path);
            Err(SightlineError::new(
                &format!("Unknown field path: {}", path),
                ErrorKind::InvalidFieldName,
            ))
        }
    }

    /// Iterates the include paths in insertion order.
    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(String::as_str)
    }

    /// Iterates the exclude paths in insertion order.
    pub fn excludes(&self) -> impl Iterator<Item = &str> {
        self.excludes.iter().map(String::as_str)
    }

    /// Checks whether neither list carries any path.
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}
