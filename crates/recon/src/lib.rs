//! `dupcheck-recon` - record linkage of two tables on a normalized key.
//!
//! Pure engine crate: receives loaded tables, returns the joined result.
//! No CLI or IO dependencies.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod join;
pub mod model;
pub mod normalize;
pub mod project;

pub use config::LinkConfig;
pub use engine::{inspect, run};
pub use error::ReconError;
pub use model::{ColumnSelection, MatchMode, MatchOutcome, MatchRequest};
