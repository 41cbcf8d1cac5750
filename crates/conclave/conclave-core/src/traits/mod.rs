//! Seams between the pure pipeline stages and their collaborators.

mod calibration_store;
mod collaborators;
mod run_store;

pub use calibration_store::{CasOutcome, ICalibrationStore};
pub use collaborators::{IPerformanceSource, IPredictionSource, ISettlementFeed};
pub use run_store::IRunStore;
