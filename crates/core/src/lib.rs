//! Domain types shared by the clicklog crates.
//!
//! Holds the [`visit::VisitRecord`] written once per logged visit and the
//! [`sink::VisitSink`] seam that storage backends implement.

pub mod error;
pub mod sink;
pub mod visit;
