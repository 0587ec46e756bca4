//! Compilation of search filters into backend-agnostic queries.
//!
//! [SearchCompiler] is the entry point: it walks a
//! [SearchFilter](crate::filter::SearchFilter) and produces a
//! [CompiledQuery] holding the predicate tree, an optional exclude tree and
//! the field projection. The sub-compilers live in their own modules:
//!
//! - `date` - range, overlap, time-of-day and recurring-yearly-period
//!   filters, leap-year aware.
//! - `area` - bounding boxes and free-form geometries, normalized and
//!   reprojected to WGS84 before they become predicates.
//! - `auth` - per-user sensitivity clearance, compiled into a visibility
//!   predicate that fails closed.
//!
//! Compilation is pure and synchronous. The only shared state is the
//! transformer's point cache, which is safe under concurrent readers.
//!
//! # Examples
//!
//! ```rust,ignore
//! use sightline::compile::SearchCompiler;
//! use sightline::filter::SearchFilter;
//!
//! let compiler = SearchCompiler::new()?;
//! let filter: SearchFilter = serde_json::from_str(request_body)?;
//! let compiled = compiler.compile(&filter)?;
//! ```

mod area;
mod auth;
mod compiler;
mod date;

pub use compiler::*;
