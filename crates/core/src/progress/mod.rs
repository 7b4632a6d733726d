//! Per-job progress tracking.
//!
//! Workers feed output lines through [`parse_line`] and apply the resulting
//! signals to the shared [`ProgressStore`]; HTTP handlers read snapshots
//! from the same store.

mod parser;
mod store;
mod types;

pub use parser::{parse_line, ProgressSignal, SignalKind};
pub use store::ProgressStore;
pub use types::{JobStatus, ProgressRecord, ProgressSnapshot};
