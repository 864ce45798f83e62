//! Output module for harvested records and run reports
//!
//! This module handles:
//! - The `BilingualRecord` line format
//! - Serialized, append-only JSON Lines writing shared by all workers
//! - Recording run statistics

mod record;
pub mod stats;
mod writer;

pub use record::BilingualRecord;
pub use stats::{print_statistics, HarvestStats};
pub use writer::{read_records, JsonlWriter};
