//! Club roster tooling: group member and volunteer rows into families, render
//! the family roster, and reconcile roster emails against outside lists.

pub mod build;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod render;
pub mod source;

pub use error::{MalformedRow, MergeError, RosterError, RosterResult};
