//! State module for tracking pair outcomes
//!
//! Every candidate pair ends in exactly one `PairOutcome`. Outcomes drive
//! logging and the run statistics; nothing is persisted across runs.

mod pair_state;

// Re-export main types
pub use pair_state::PairOutcome;
