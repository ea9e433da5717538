//! `courtsync-recon`: court location reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded federal and government tables,
//! returns cleaned tables, verdicts and an update plan. No file, network or
//! database access.

pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod matcher;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod planner;
pub mod prepare;
pub mod summary;
pub mod table;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{ReconInput, ReconResult, UpdateInstruction, UpdatePlan};
