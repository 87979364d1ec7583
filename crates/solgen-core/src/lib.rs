//! Core types and transformations for the solar generation forecast service
//!
//! This crate holds the pure pipeline: parameter validation against a
//! declarative schema, forecast query construction, irradiance-to-power
//! derivation, and the chart rollups. All I/O lives in sibling crates.

pub mod pipeline;
pub mod query;
pub mod rollups;
pub mod schema;
pub mod series;
pub mod types;
pub mod validate;

pub use pipeline::*;
pub use query::*;
pub use rollups::*;
pub use schema::*;
pub use series::*;
pub use types::*;
pub use validate::*;
