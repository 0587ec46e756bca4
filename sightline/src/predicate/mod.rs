//! Backend-agnostic query predicates for compiled search filters.
//!
//! This module defines the predicate tree a compiled search filter produces.
//! The tree is a plain data structure: it carries typed leaves (terms,
//! ranges, geo shapes, scripts) combined by boolean nodes, and the execution
//! layer serializes it into the search engine's own wire format.
//!
//! # Building Predicates
//!
//! Predicates are created through typed constructors and combined through
//! group helpers:
//! - `Predicate::term("sensitive", false)` - scalar equality
//! - `Predicate::terms("taxon.id", vec![100077i32])` - set membership
//! - `Predicate::at_most("location.coordinateUncertaintyInMeters", 500i32)`
//! - `Predicate::all_of(...)` / `Predicate::any_of(...)` - explicit groups
//! - [PredicateBuilder] - accumulates the groups of a `Bool` node
//!
//! # Empty Groups
//!
//! Empty collections are special-cased explicitly: `all_of` of nothing
//! matches nothing and `any_of` of nothing matches everything. A conjunction
//! that lost all of its branches must never widen into an unconstrained
//! query.
//!
//! # Examples
//!
//! ```rust,ignore
//! use sightline::predicate::{Predicate, PredicateBuilder};
//!
//! let mut builder = PredicateBuilder::new();
//! builder
//!     .add_terms("taxon.id", vec![100077i32, 103025])
//!     .add_flag("occurrence.isPositiveObservation", true);
//! let predicate = builder.build();
//! ```

mod builder;
mod projection;
mod tree;
mod value;

pub use builder::*;
pub use projection::*;
pub use tree::*;
pub use value::*;
