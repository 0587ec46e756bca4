//! # Sightline - Search Query Compilation for Species Observations
//!
//! Sightline is the query-compilation layer of a species-observation search
//! platform. It turns a declarative, deeply nested search filter into a
//! backend-agnostic predicate tree plus a field projection, enforcing
//! per-user data-sensitivity rules so that protected-species location data
//! never leaves a caller's granted clearance.
//!
//! ## Key Features
//!
//! - **Declarative Filters**: A serde model of the platform's JSON filter
//!   contract, immutable per request
//! - **Engine-Neutral Predicates**: A typed predicate tree with explicit
//!   empty-group semantics; the execution layer owns the wire format
//! - **Fail-Closed Authorization**: Sensitivity grants compile to visibility
//!   predicates that can only ever narrow a query
//! - **Leap-Year-Correct Dates**: Recurring yearly periods compile to
//!   day-of-year sets probed in both a leap and a common year
//! - **Geospatial Predicates**: Input geometries are repaired and
//!   reprojected to WGS84 through the `sightline-geo` crate
//! - **Validated Projections**: Output field paths are checked against a
//!   static schema table, so a typo fails the request instead of silently
//!   changing the output
//!
//! ## Quick Start
//!
//! ```rust
//! use sightline::compile::SearchCompiler;
//! use sightline::filter::SearchFilter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Built once per process; compilation is pure and thread-safe.
//! let compiler = SearchCompiler::new()?;
//!
//! let filter: SearchFilter = serde_json::from_str(
//!     r#"{"taxon": {"ids": [100077]}, "verifiedOnly": true}"#,
//! )?;
//!
//! let compiled = compiler.compile(&filter)?;
//! assert!(!compiled.generalization_visible);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`compile`] - The search compiler and its date, area, and
//!   authorization sub-compilers
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - The JSON filter contract model
//! - [`predicate`] - The predicate tree, builder, and field projection
//! - [`schema`] - The static field-path table of the observation index

pub mod compile;
pub mod errors;
pub mod filter;
pub mod predicate;
pub mod schema;

// Re-export the primary types
pub use compile::{CompiledQuery, SearchCompiler};
pub use errors::{ErrorKind, SightlineError, SightlineResult};
pub use filter::SearchFilter;
pub use predicate::{Predicate, Projection};
