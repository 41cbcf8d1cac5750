//! # conclave-pipeline
//!
//! Wires the stages into one run:
//!
//! ```text
//! begin → gate → score → select council → weight → aggregate → settle → complete
//! ```
//!
//! Every write carries the run id. A run becomes visible as complete only
//! after every stage has persisted its rows.

pub mod collaborators;
pub mod pipeline;
pub mod report;

pub use collaborators::Collaborators;
pub use pipeline::{ConclavePipeline, PipelineOptions};
pub use report::RunReport;
