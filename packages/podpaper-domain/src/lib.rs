//! Pure preference-scoring core: similarity aggregation, facet scoring, ranking and adaptive
//! profile updates. Nothing in this crate performs I/O.

pub mod document;
pub mod embedding;
pub mod profile;
pub mod ranking;
pub mod scoring;
pub mod similarity;
pub mod update;

mod error;

pub use error::{Error, Result};
