//! `tally-recon` — Deterministic two-ledger reconciliation engine.
//!
//! Pure engine crate: receives extracted transaction records from two
//! independently sourced ledgers, returns a row-by-row Tally / Not Tally
//! comparison. No IO or UI dependencies.

pub mod canonical;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod input;
pub mod model;
pub mod normalize;

pub use config::ReconConfig;
pub use engine::{reconcile, run};
pub use error::{ReconError, Side};
pub use model::{ComparisonRow, RawRecord, ReconInput, ReconResult, Status};
