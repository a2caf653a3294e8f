pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::Settings;
pub use crate::core::{
    classifier::HttpClassifier,
    engine::{RunReport, VerifierEngine},
    runner::BatchRunner,
};
pub use domain::model::{Classification, ParticipantRecord, Platform, ProbeOutcome, ResultRecord, Selection};
pub use utils::error::{Result, VerifyError};
