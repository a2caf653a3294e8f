pub mod classifier;
pub mod engine;
pub mod merge;
pub mod runner;

pub use crate::domain::model::{ParticipantRecord, Platform, ProbeOutcome, ResultRecord, Selection};
pub use crate::domain::ports::{Probe, ResultSink};
pub use crate::utils::error::Result;
