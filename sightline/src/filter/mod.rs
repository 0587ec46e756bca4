//! The platform's JSON search-filter contract.
//!
//! This module models the declarative filter a caller submits: taxonomic,
//! temporal, spatial, administrative and access-control criteria plus
//! output shaping. Field and enum names follow the JSON contract exactly
//! (camelCase fields, PascalCase enum values), so a filter deserialized from
//! a request compiles identically to one built in code.
//!
//! Filters are plain data. Compilation into a predicate tree lives in
//! [crate::compile].

mod authorization;
mod date;
mod location;
mod output;
mod search_filter;
mod sighting;
mod taxon;

pub use authorization::*;
pub use date::*;
pub use location::*;
pub use output::*;
pub use search_filter::*;
pub use sighting::*;
pub use taxon::*;
